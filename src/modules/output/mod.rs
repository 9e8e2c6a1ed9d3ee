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


use std::fs;
use std::path::PathBuf;

use crate::modules::engine::run::MessageWriter;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::raise_error;

/// Persists serialized messages as individual files in one directory.
#[derive(Debug)]
pub struct EmlDirWriter {
    dir: PathBuf,
}

impl EmlDirWriter {
    /// Creates the output directory (and parents) up front so the run fails
    /// before any generation work if the location is unusable.
    pub fn create(dir: impl Into<PathBuf>) -> MailforgeResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            raise_error!(
                format!("failed to create output directory '{}': {}", dir.display(), e),
                ErrorCode::WriteFailed
            )
        })?;
        Ok(EmlDirWriter { dir })
    }
}

impl MessageWriter for EmlDirWriter {
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> MailforgeResult<()> {
        let path = self.dir.join(filename);
        fs::write(&path, bytes).map_err(|e| {
            raise_error!(
                format!("failed to write '{}': {}", path.display(), e),
                ErrorCode::WriteFailed
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_writes_bytes_under_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("corpus");
        let mut writer = EmlDirWriter::create(&out).unwrap();
        writer.persist("email_000001.eml", b"From: a@b\r\n\r\nhi").unwrap();

        let written = fs::read(out.join("email_000001.eml")).unwrap();
        assert_eq!(written, b"From: a@b\r\n\r\nhi");
    }

    #[test]
    fn test_unwritable_location_fails_with_write_error() {
        let error = EmlDirWriter::create("/proc/definitely/not/writable").unwrap_err();
        assert_eq!(error.code(), ErrorCode::WriteFailed);
    }
}
