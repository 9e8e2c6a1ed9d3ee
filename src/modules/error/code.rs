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


#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCode {
    // Configuration and usage errors (10000–10999)
    InvalidParameter = 10000,
    MissingConfiguration = 10020,

    // Input corpus errors (30000–30999)
    ResourceNotFound = 30000,
    EmptyPool = 30010,

    // Content errors (50000–50999)
    TemplateLoad = 50000,
    AttachmentRead = 50010,
    MessageBuild = 50020,

    // Output and internal errors (70000–70999)
    InternalError = 70000,
    WriteFailed = 70010,
    IoError = 70020,
}

impl ErrorCode {
    /// Exit status the process reports when a run fails with this code.
    /// Usage and configuration mistakes exit 2, runtime failures exit 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorCode::InvalidParameter
            | ErrorCode::MissingConfiguration
            | ErrorCode::ResourceNotFound => 2,
            ErrorCode::EmptyPool
            | ErrorCode::TemplateLoad
            | ErrorCode::AttachmentRead
            | ErrorCode::MessageBuild
            | ErrorCode::InternalError
            | ErrorCode::WriteFailed
            | ErrorCode::IoError => 1,
        }
    }
}
