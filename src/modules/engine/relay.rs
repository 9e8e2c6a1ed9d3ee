//
// Copyright (c) 2025 The Mailforge Authors
//
// This file is part of the Mailforge Synthetic Mail Project
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.


use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::Rng;

/// One synthetic relay traversal, rendered into a `Received`-style line.
#[derive(Clone, Debug)]
pub struct RelayHop {
    pub source: String,
    pub destination: String,
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
}

impl RelayHop {
    pub fn render(&self) -> String {
        format!(
            "from {} by {} with ESMTP id {}; {}",
            self.source,
            self.destination,
            self.transaction_id,
            self.timestamp.to_rfc2822()
        )
    }
}

/// Builds an oldest-first chain of 1–3 hops ending strictly before
/// `send_time`. An empty host pool yields an empty chain.
///
/// The chain anchor sits 5–15 minutes before the send time and every hop adds
/// 30–90 seconds, so hop timestamps strictly increase and even a maximal
/// chain (3 hops, 270 s) stays short of the minimal 5-minute anchor offset.
pub fn build_chain(
    rng: &mut StdRng,
    relay_hosts: &[String],
    send_time: DateTime<Utc>,
) -> Vec<RelayHop> {
    if relay_hosts.is_empty() {
        return Vec::new();
    }
    let hops = rng.random_range(1..=3usize);
    let chain: Vec<&String> = (0..hops + 1)
        .map(|_| &relay_hosts[rng.random_range(0..relay_hosts.len())])
        .collect();

    let mut at = send_time - Duration::minutes(rng.random_range(5..=15));
    let mut out = Vec::with_capacity(hops);
    for pair in chain.windows(2) {
        at += Duration::seconds(rng.random_range(30..=90));
        out.push(RelayHop {
            source: pair[0].clone(),
            destination: pair[1].clone(),
            transaction_id: format!("{:08x}", rng.random_range(0..=0xffff_ffffu64)),
            timestamp: at,
        });
    }
    out
}
