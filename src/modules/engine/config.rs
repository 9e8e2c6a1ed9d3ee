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


use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};

use crate::modules::engine::selector::SelectionMode;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::modules::settings::cli::{BusinessHours, Settings};
use crate::raise_error;

/// Inclusive UTC range the send timestamps are drawn from. `start` is the
/// first day at midnight, `end` the last day at 23:59:59.
#[derive(Clone, Copy, Debug)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> MailforgeResult<Self> {
        if start > end {
            return Err(raise_error!(
                "date range start cannot be after its end".into(),
                ErrorCode::InvalidParameter
            ));
        }
        // NaiveDate always carries a valid midnight / end-of-day time.
        let start = start.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
        let end = end.and_hms_opt(23, 59, 59).expect("valid time").and_utc();
        Ok(DateRange { start, end })
    }
}

/// Time-of-day weighting applied on top of a date range.
#[derive(Clone, Copy, Debug)]
pub struct BusinessProfile {
    pub window: BusinessHours,
    pub bias_pct: u8,
}

/// The immutable parameter set one generation run operates under, resolved
/// from the CLI settings (profile defaults first, explicit flags on top).
#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub html_pct: u8,
    pub attach_pct: u8,
    pub subject_len: usize,
    pub num_emails: u64,
    pub selection_mode: SelectionMode,
    pub max_attachments: usize,
    pub seed: Option<u64>,
    pub date_range: Option<DateRange>,
    pub business: Option<BusinessProfile>,
    /// Consumed by the output writer, never by the engine itself.
    pub output_dir: PathBuf,
}

impl GenerationConfig {
    pub fn resolve(settings: &Settings) -> MailforgeResult<Self> {
        let defaults = settings.mailforge_profile.map(|profile| profile.defaults());

        let html_pct = settings
            .mailforge_html_pct
            .or(defaults.as_ref().map(|d| d.html_pct))
            .ok_or_else(|| missing("html-pct"))?;
        let attach_pct = settings
            .mailforge_attach_pct
            .or(defaults.as_ref().map(|d| d.attach_pct))
            .ok_or_else(|| missing("attach-pct"))?;
        let subject_len = settings
            .mailforge_subject_len
            .or(defaults.as_ref().map(|d| d.subject_len))
            .ok_or_else(|| missing("subject-len"))? as usize;
        let num_emails = settings
            .mailforge_num_emails
            .or(defaults.as_ref().map(|d| d.num_emails))
            .ok_or_else(|| missing("num-emails"))?;
        let output_dir = settings
            .mailforge_output_dir
            .clone()
            .or(defaults.as_ref().map(|d| PathBuf::from(d.output_dir)))
            .ok_or_else(|| missing("output-dir"))?;

        let date_range = match (settings.mailforge_date_start, settings.mailforge_date_end) {
            (Some(start), Some(end)) => Some(DateRange::from_dates(start, end)?),
            (None, None) => None,
            _ => {
                return Err(raise_error!(
                    "both --mailforge-date-start and --mailforge-date-end must be provided together"
                        .into(),
                    ErrorCode::InvalidParameter
                ));
            }
        };
        let business = date_range.map(|_| BusinessProfile {
            window: settings.mailforge_business_hours,
            bias_pct: settings.mailforge_business_bias,
        });

        Ok(GenerationConfig {
            html_pct,
            attach_pct,
            subject_len,
            num_emails,
            selection_mode: settings.mailforge_selection_mode,
            max_attachments: settings.mailforge_max_attachments,
            seed: settings.mailforge_seed,
            date_range,
            business,
            output_dir,
        })
    }
}

fn missing(flag: &str) -> crate::modules::error::MailforgeError {
    raise_error!(
        format!(
            "--mailforge-{} is required when no profile supplies it",
            flag
        ),
        ErrorCode::MissingConfiguration
    )
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "mailforge",
            "--mailforge-to-list",
            "to.txt",
            "--mailforge-from-list",
            "from.txt",
            "--mailforge-body-dir",
            "bodies",
            "--mailforge-html-dir",
            "html",
            "--mailforge-attach-dir",
            "attachments",
            "--mailforge-relay-hosts",
            "relays.txt",
        ]
    }

    fn parse(extra: &[&str]) -> Settings {
        let mut args = base_args();
        args.extend_from_slice(extra);
        Settings::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_resolve_requires_tunables_without_profile() {
        let settings = parse(&[]);
        let error = GenerationConfig::resolve(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::MissingConfiguration);
    }

    #[test]
    fn test_profile_supplies_defaults_and_flags_override() {
        let settings = parse(&[
            "--mailforge-profile",
            "marketing",
            "--mailforge-num-emails",
            "5",
        ]);
        let config = GenerationConfig::resolve(&settings).unwrap();
        assert_eq!(config.html_pct, 98);
        assert_eq!(config.attach_pct, 2);
        assert_eq!(config.subject_len, 50);
        assert_eq!(config.num_emails, 5);
        assert_eq!(config.output_dir, PathBuf::from("output_emails/"));
        assert!(config.date_range.is_none());
        assert!(config.business.is_none());
    }

    #[test]
    fn test_date_flags_must_come_together() {
        let settings = parse(&[
            "--mailforge-profile",
            "internal-ops",
            "--mailforge-date-start",
            "2024-01-01",
        ]);
        let error = GenerationConfig::resolve(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_inverted_date_range_is_rejected() {
        let settings = parse(&[
            "--mailforge-profile",
            "internal-ops",
            "--mailforge-date-start",
            "2024-06-01",
            "--mailforge-date-end",
            "2024-01-01",
        ]);
        let error = GenerationConfig::resolve(&settings).unwrap_err();
        assert_eq!(error.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_date_range_spans_whole_days() {
        let settings = parse(&[
            "--mailforge-profile",
            "mixed-business",
            "--mailforge-date-start",
            "2024-01-01",
            "--mailforge-date-end",
            "2024-01-31",
        ]);
        let config = GenerationConfig::resolve(&settings).unwrap();
        let range = config.date_range.unwrap();
        assert_eq!(range.start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2024-01-31T23:59:59+00:00");
        let business = config.business.unwrap();
        assert_eq!(business.window.start_min, 480);
        assert_eq!(business.window.end_min, 1080);
        assert_eq!(business.bias_pct, 70);
    }

    #[test]
    fn test_percentages_are_range_checked_by_the_parser() {
        let mut args = base_args();
        args.extend_from_slice(&["--mailforge-html-pct", "101"]);
        assert!(Settings::try_parse_from(args).is_err());
    }
}
