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


use std::{fmt, path::PathBuf, str::FromStr, sync::LazyLock};

use chrono::NaiveDate;
use clap::Parser;
use regex::Regex;

use crate::modules::engine::selector::SelectionMode;
use crate::modules::settings::profile::Profile;

static BUSINESS_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})-(\d{2}):(\d{2})$").unwrap());

#[derive(Debug, Parser)]
#[clap(
    name = "mailforge",
    about = "Generates realistic-looking .eml files in bulk from sample content pools",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// Path to the file listing recipient addresses, one per line
    #[clap(long, env, help = "Path to file with recipient emails")]
    pub mailforge_to_list: PathBuf,

    /// Path to the file listing sender addresses, one per line
    #[clap(long, env, help = "Path to file with sender emails")]
    pub mailforge_from_list: PathBuf,

    /// Directory holding plain text body samples (.txt/.md/.text)
    #[clap(long, env, help = "Directory with plain text body samples")]
    pub mailforge_body_dir: PathBuf,

    /// Directory holding HTML body samples (.html/.htm)
    #[clap(long, env, help = "Directory with HTML content samples")]
    pub mailforge_html_dir: PathBuf,

    /// Directory holding attachment files (any regular file)
    #[clap(long, env, help = "Directory with attachment files")]
    pub mailforge_attach_dir: PathBuf,

    /// Path to the file listing relay hostnames, one per line
    #[clap(long, env, help = "Path to file with relay hostnames")]
    pub mailforge_relay_hosts: PathBuf,

    /// Predefined traffic profile supplying defaults for the tunables below
    #[clap(long, env, help = "Predefined traffic profile")]
    pub mailforge_profile: Option<Profile>,

    #[clap(
        long,
        env,
        help = "Percentage of emails rendered as HTML (0-100)",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub mailforge_html_pct: Option<u8>,

    #[clap(
        long,
        env,
        help = "Percentage of emails carrying attachments (0-100)",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub mailforge_attach_pct: Option<u8>,

    #[clap(
        long,
        env,
        help = "Number of characters taken from the body for the subject (>=1)",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub mailforge_subject_len: Option<u32>,

    #[clap(
        long,
        env,
        help = "Number of emails to generate (>0)",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub mailforge_num_emails: Option<u64>,

    /// Directory the generated .eml files are written into
    #[clap(long, env, help = "Directory to save generated .eml files")]
    pub mailforge_output_dir: Option<PathBuf>,

    /// How senders, recipients, content and attachments are picked
    #[clap(
        long,
        env,
        default_value = "random",
        help = "How to select senders/recipients/content/attachments"
    )]
    pub mailforge_selection_mode: SelectionMode,

    #[clap(
        long,
        env,
        default_value = "4",
        help = "Upper cap on attachments per email",
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub mailforge_max_attachments: usize,

    /// Seeds the shared generator so a fixed seed reproduces identical output
    #[clap(long, env, help = "Random seed for reproducibility")]
    pub mailforge_seed: Option<u64>,

    /// Start of the randomized timestamp range (YYYY-MM-DD, UTC)
    #[clap(long, env, help = "Start date for randomized timestamps (YYYY-MM-DD, UTC)")]
    pub mailforge_date_start: Option<NaiveDate>,

    /// End of the randomized timestamp range, inclusive (YYYY-MM-DD, UTC)
    #[clap(long, env, help = "End date for randomized timestamps (YYYY-MM-DD, UTC)")]
    pub mailforge_date_end: Option<NaiveDate>,

    /// Daily window that business-biased timestamps land in
    #[clap(
        long,
        env,
        default_value = "08:00-18:00",
        help = "Business hours window (HH:MM-HH:MM)"
    )]
    pub mailforge_business_hours: BusinessHours,

    #[clap(
        long,
        env,
        default_value = "70",
        help = "Percentage of timestamps within business hours (0-100)",
        value_parser = clap::value_parser!(u8).range(0..=100)
    )]
    pub mailforge_business_bias: u8,

    /// mailforge log level (default: "info")
    #[clap(long, default_value = "info", env, help = "Set the log level for mailforge")]
    pub mailforge_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub mailforge_ansi_logs: bool,

    /// Enable JSON logs (default: false)
    #[clap(long, default_value = "false", env, help = "Enable JSON formatted logs")]
    pub mailforge_json_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub mailforge_log_to_file: bool,

    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Directory the rolling log files are written into"
    )]
    pub mailforge_log_dir: PathBuf,
}

/// A same-day time window expressed in minutes from midnight.
///
/// Parsed from `HH:MM-HH:MM`; `24:00` is accepted as an end-of-day bound so a
/// full-day window (`00:00-24:00`) stays representable. Overnight windows
/// (start at or after end) are rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BusinessHours {
    pub start_min: u16,
    pub end_min: u16,
}

impl FromStr for BusinessHours {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let captures = BUSINESS_HOURS_RE.captures(spec.trim()).ok_or_else(|| {
            format!(
                "invalid business hours format: {}. Use HH:MM-HH:MM (e.g., 09:00-17:30)",
                spec
            )
        })?;
        // The regex guarantees two-digit groups, so the parses cannot fail.
        let fields: Vec<u16> = captures
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().parse().unwrap_or_default())
            .collect();
        let (sh, sm, eh, em) = (fields[0], fields[1], fields[2], fields[3]);
        if sh > 23 || sm > 59 {
            return Err(format!("invalid start time in business hours: {}", spec));
        }
        if eh > 24 || (eh < 24 && em > 59) || (eh == 24 && em != 0) {
            return Err(format!("invalid end time in business hours: {}", spec));
        }
        let start_min = sh * 60 + sm;
        let end_min = eh * 60 + em;
        if start_min >= end_min {
            return Err(
                "business hours must have start < end within the same day (no overnight windows)"
                    .to_string(),
            );
        }
        Ok(BusinessHours { start_min, end_min })
    }
}

impl fmt::Display for BusinessHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_min / 60,
            self.start_min % 60,
            self.end_min / 60,
            self.end_min % 60
        )
    }
}
