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


use code::ErrorCode;
use snafu::{Location, Snafu};

pub mod code;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum MailforgeError {
    #[snafu(display("{message}"))]
    Generic {
        message: String,
        #[snafu(implicit)]
        location: Location,
        code: ErrorCode,
    },
    IoError {
        source: std::io::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

pub type MailforgeResult<T, E = MailforgeError> = std::result::Result<T, E>;

impl From<std::io::Error> for MailforgeError {
    fn from(source: std::io::Error) -> Self {
        Self::IoError {
            source,
            location: Location::default(),
        }
    }
}

impl MailforgeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MailforgeError::Generic { code, .. } => *code,
            MailforgeError::IoError { .. } => ErrorCode::IoError,
        }
    }

    /// Process exit status for a failed run.
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }
}

/// Builds a `MailforgeError::Generic` with the caller's source location.
#[macro_export]
macro_rules! raise_error {
    ($message:expr, $code:expr) => {
        $crate::modules::error::MailforgeError::Generic {
            message: $message,
            location: snafu::Location::default(),
            code: $code,
        }
    };
}
