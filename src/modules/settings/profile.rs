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


use std::fmt;

use clap::ValueEnum;

/// Predefined traffic shapes. A profile only supplies defaults; explicit
/// flags always win.
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Profile {
    #[clap(name = "mixed-business")]
    MixedBusiness,
    #[clap(name = "internal-ops")]
    InternalOps,
    #[clap(name = "marketing")]
    Marketing,
}

/// Tunable defaults contributed by a profile.
#[derive(Clone, Debug)]
pub struct ProfileDefaults {
    pub html_pct: u8,
    pub attach_pct: u8,
    pub subject_len: u32,
    pub num_emails: u64,
    pub output_dir: &'static str,
}

impl Profile {
    pub fn defaults(&self) -> ProfileDefaults {
        match self {
            Profile::MixedBusiness => ProfileDefaults {
                html_pct: 88,
                attach_pct: 25,
                subject_len: 50,
                num_emails: 1000,
                output_dir: "output_emails/",
            },
            Profile::InternalOps => ProfileDefaults {
                html_pct: 75,
                attach_pct: 15,
                subject_len: 50,
                num_emails: 1000,
                output_dir: "output_emails/",
            },
            Profile::Marketing => ProfileDefaults {
                html_pct: 98,
                attach_pct: 2,
                subject_len: 50,
                num_emails: 1000,
                output_dir: "output_emails/",
            },
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::MixedBusiness => write!(f, "mixed-business"),
            Profile::InternalOps => write!(f, "internal-ops"),
            Profile::Marketing => write!(f, "marketing"),
        }
    }
}
