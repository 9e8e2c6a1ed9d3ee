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


use std::collections::HashMap;
use std::fmt;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::raise_error;

/// Fixed discrete distribution over attachment counts per message.
pub const ATTACH_COUNT_DIST: [(usize, f64); 4] =
    [(1, 0.80), (2, 0.15), (3, 0.04), (4, 0.01)];

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum SelectionMode {
    #[clap(name = "random")]
    Random,
    #[clap(name = "linear")]
    Linear,
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Random => write!(f, "random"),
            SelectionMode::Linear => write!(f, "linear"),
        }
    }
}

/// Logical selection slots. Each slot cycles independently in linear mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Slot {
    Sender,
    Recipient,
    TextBody,
    HtmlBody,
    Attachment,
}

/// Picks one item per call from a pool, either uniformly at random or
/// round-robin with one cursor per slot.
pub struct Selector {
    mode: SelectionMode,
    cursors: HashMap<Slot, usize>,
}

impl Selector {
    pub fn new(mode: SelectionMode) -> Self {
        Selector {
            mode,
            cursors: HashMap::new(),
        }
    }

    pub fn choose<'a, T>(
        &mut self,
        slot: Slot,
        items: &'a [T],
        rng: &mut StdRng,
    ) -> MailforgeResult<&'a T> {
        if items.is_empty() {
            return Err(raise_error!(
                format!("selection pool for slot {:?} is empty", slot),
                ErrorCode::EmptyPool
            ));
        }
        match self.mode {
            SelectionMode::Random => {
                let index = rng.random_range(0..items.len());
                debug!("random selected (slot {:?}): index {}", slot, index);
                Ok(&items[index])
            }
            SelectionMode::Linear => {
                let cursor = self.cursors.entry(slot).or_insert(0);
                let index = *cursor % items.len();
                *cursor = (index + 1) % items.len();
                debug!("linear selected (slot {:?}): index {}", slot, index);
                Ok(&items[index])
            }
        }
    }
}

/// Draws an attachment count from `ATTACH_COUNT_DIST` restricted to counts
/// at most `max_cap`, proportionally to the surviving weights. Returns 1 when
/// the cap filters everything out.
pub fn draw_attachment_count(rng: &mut StdRng, max_cap: usize) -> usize {
    let surviving: Vec<(usize, f64)> = ATTACH_COUNT_DIST
        .iter()
        .copied()
        .filter(|(count, _)| *count <= max_cap)
        .collect();
    let total: f64 = surviving.iter().map(|(_, weight)| weight).sum();
    if surviving.is_empty() || total <= 0.0 {
        return 1;
    }
    let roll = rng.random::<f64>() * total;
    let mut upto = 0.0;
    for (count, weight) in &surviving {
        if upto + weight >= roll {
            return *count;
        }
        upto += weight;
    }
    surviving[surviving.len() - 1].0
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_linear_cycles_through_pool_in_order() {
        let items = vec!["a", "b", "c"];
        let mut selector = Selector::new(SelectionMode::Linear);
        let mut rng = rng();

        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(*selector.choose(Slot::Sender, &items, &mut rng).unwrap());
        }
        assert_eq!(seen, vec!["a", "b", "c", "a", "b", "c"]);
    }

    #[test]
    fn test_linear_cursors_are_independent_per_slot() {
        let senders = vec!["s1", "s2"];
        let recipients = vec!["r1", "r2", "r3"];
        let mut selector = Selector::new(SelectionMode::Linear);
        let mut rng = rng();

        assert_eq!(
            *selector.choose(Slot::Sender, &senders, &mut rng).unwrap(),
            "s1"
        );
        assert_eq!(
            *selector
                .choose(Slot::Recipient, &recipients, &mut rng)
                .unwrap(),
            "r1"
        );
        assert_eq!(
            *selector.choose(Slot::Sender, &senders, &mut rng).unwrap(),
            "s2"
        );
        assert_eq!(
            *selector
                .choose(Slot::Recipient, &recipients, &mut rng)
                .unwrap(),
            "r2"
        );
    }

    #[test]
    fn test_random_only_returns_pool_members() {
        let items = vec![1, 2, 3, 4];
        let mut selector = Selector::new(SelectionMode::Random);
        let mut rng = rng();
        for _ in 0..100 {
            let picked = selector.choose(Slot::TextBody, &items, &mut rng).unwrap();
            assert!(items.contains(picked));
        }
    }

    #[test]
    fn test_empty_pool_is_an_error() {
        let items: Vec<String> = Vec::new();
        let mut selector = Selector::new(SelectionMode::Random);
        let mut rng = rng();
        let error = selector
            .choose(Slot::Attachment, &items, &mut rng)
            .unwrap_err();
        assert_eq!(error.code(), ErrorCode::EmptyPool);
    }

    #[test]
    fn test_attachment_count_respects_cap() {
        let mut rng = rng();
        for _ in 0..1000 {
            let count = draw_attachment_count(&mut rng, 2);
            assert!(count == 1 || count == 2);
        }
    }

    #[test]
    fn test_attachment_count_frequencies_follow_weights() {
        // Capped at 2 the surviving distribution is {1: 0.80/0.95, 2: 0.15/0.95}.
        let mut rng = rng();
        let draws = 20_000;
        let ones = (0..draws)
            .filter(|_| draw_attachment_count(&mut rng, 2) == 1)
            .count();
        let observed = ones as f64 / draws as f64;
        let expected = 0.80 / 0.95;
        assert!(
            (observed - expected).abs() < 0.02,
            "observed {} expected {}",
            observed,
            expected
        );
    }

    #[test]
    fn test_attachment_count_unfiltered_covers_all_counts() {
        let mut rng = rng();
        let mut seen = [false; 5];
        for _ in 0..50_000 {
            seen[draw_attachment_count(&mut rng, 4)] = true;
        }
        assert!(seen[1] && seen[2] && seen[3] && seen[4]);
    }

    #[test]
    fn test_attachment_count_empty_filter_returns_one() {
        let mut rng = rng();
        assert_eq!(draw_attachment_count(&mut rng, 0), 1);
    }
}
