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

use crate::modules::engine::config::{BusinessProfile, DateRange};

/// Uniform whole-second draw over the inclusive range.
pub fn sample_uniform(rng: &mut StdRng, range: &DateRange) -> DateTime<Utc> {
    let span = (range.end - range.start).num_seconds();
    let offset = rng.random_range(0..=span);
    range.start + Duration::seconds(offset)
}

/// Draws a timestamp biased toward the business-hours window.
///
/// A calendar day is picked uniformly, then the minute-of-day comes from the
/// window with probability `bias_pct`/100 and from the complement minutes
/// otherwise. A full-day window leaves no complement; those draws fall back
/// into the window instead of failing. Candidates landing outside the range
/// (possible only on its first and last day) are clamped to the nearer
/// boundary, not resampled.
pub fn sample_business_weighted(
    rng: &mut StdRng,
    range: &DateRange,
    business: &BusinessProfile,
) -> DateTime<Utc> {
    let window = business.window;
    let day_span = (range.end.date_naive() - range.start.date_naive()).num_days();
    let day = range.start.date_naive() + Duration::days(rng.random_range(0..=day_span));

    let in_business = rng.random_range(1..=100u32) <= business.bias_pct as u32;

    let minute_in_day = if in_business && window.start_min < window.end_min {
        rng.random_range(window.start_min..window.end_min)
    } else {
        let complement: Vec<u16> = (0..window.start_min)
            .chain(window.end_min..24 * 60)
            .collect();
        if complement.is_empty() {
            rng.random_range(window.start_min..window.end_min)
        } else {
            complement[rng.random_range(0..complement.len())]
        }
    };

    let hour = u32::from(minute_in_day / 60);
    let minute = u32::from(minute_in_day % 60);
    let second = rng.random_range(0..=59);

    // minute_in_day < 1440, so the time of day is always constructible.
    let candidate = day
        .and_hms_opt(hour, minute, second)
        .expect("valid time of day")
        .and_utc();
    candidate.clamp(range.start, range.end)
}
