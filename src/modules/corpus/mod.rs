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
use std::path::{Path, PathBuf};

use email_address::EmailAddress;
use itertools::Itertools;
use tracing::warn;

use crate::modules::engine::config::GenerationConfig;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::raise_error;

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "text"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Locations the content pools are loaded from.
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    pub to_list: PathBuf,
    pub from_list: PathBuf,
    pub body_dir: PathBuf,
    pub html_dir: PathBuf,
    pub attach_dir: PathBuf,
    pub relay_hosts: PathBuf,
}

impl CorpusPaths {
    pub fn from_settings(settings: &crate::modules::settings::cli::Settings) -> Self {
        CorpusPaths {
            to_list: settings.mailforge_to_list.clone(),
            from_list: settings.mailforge_from_list.clone(),
            body_dir: settings.mailforge_body_dir.clone(),
            html_dir: settings.mailforge_html_dir.clone(),
            attach_dir: settings.mailforge_attach_dir.clone(),
            relay_hosts: settings.mailforge_relay_hosts.clone(),
        }
    }
}

/// The six ordered pools every message is assembled from, loaded once per run.
///
/// Directory listings are sorted by filename so linear selection and seeded
/// runs stay deterministic across filesystems.
#[derive(Debug, Clone, Default)]
pub struct ContentPools {
    pub senders: Vec<String>,
    pub recipients: Vec<String>,
    pub relay_hosts: Vec<String>,
    pub text_bodies: Vec<PathBuf>,
    pub html_bodies: Vec<PathBuf>,
    pub attachments: Vec<PathBuf>,
}

impl ContentPools {
    pub fn load(paths: &CorpusPaths) -> MailforgeResult<Self> {
        let recipients = read_list_file(&paths.to_list)?;
        let senders = read_list_file(&paths.from_list)?;
        let relay_hosts = read_list_file(&paths.relay_hosts)?;
        let text_bodies = list_files_with_extensions(&paths.body_dir, TEXT_EXTENSIONS)?;
        let html_bodies = list_files_with_extensions(&paths.html_dir, HTML_EXTENSIONS)?;
        let attachments = list_all_files(&paths.attach_dir)?;

        if recipients.is_empty() {
            return Err(raise_error!(
                "recipient list is empty".into(),
                ErrorCode::EmptyPool
            ));
        }
        if senders.is_empty() {
            return Err(raise_error!(
                "sender list is empty".into(),
                ErrorCode::EmptyPool
            ));
        }
        if text_bodies.is_empty() && html_bodies.is_empty() {
            return Err(raise_error!(
                "both the text body and HTML directories are empty; provide at least one"
                    .into(),
                ErrorCode::EmptyPool
            ));
        }

        warn_invalid_addresses("sender", &senders);
        warn_invalid_addresses("recipient", &recipients);

        Ok(ContentPools {
            senders,
            recipients,
            relay_hosts,
            text_bodies,
            html_bodies,
            attachments,
        })
    }

    /// Surfaces the soft gaps that degrade output without stopping the run.
    pub fn warn_gaps(&self, config: &GenerationConfig) {
        if self.text_bodies.is_empty() {
            warn!("no plain-text body files found; using stripped HTML for text fallback");
        }
        if self.html_bodies.is_empty() && config.html_pct > 0 {
            warn!("no HTML templates found; all emails will be plain text");
        }
        if self.attachments.is_empty() && config.attach_pct > 0 {
            warn!("no attachment files found; attach percentage requested but none available");
        }
        if self.relay_hosts.is_empty() {
            warn!("relay host list is empty; messages will carry no Received headers");
        }
    }
}

/// Trimmed non-empty lines of a UTF-8 (lossy) text file.
fn read_list_file(path: &Path) -> MailforgeResult<Vec<String>> {
    if !path.is_file() {
        return Err(raise_error!(
            format!("file not found: {}", path.display()),
            ErrorCode::ResourceNotFound
        ));
    }
    let raw = fs::read(path)?;
    Ok(String::from_utf8_lossy(&raw)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn list_files_with_extensions(dir: &Path, extensions: &[&str]) -> MailforgeResult<Vec<PathBuf>> {
    list_dir(dir, |path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    })
}

fn list_all_files(dir: &Path) -> MailforgeResult<Vec<PathBuf>> {
    list_dir(dir, |_| true)
}

fn list_dir(dir: &Path, keep: impl Fn(&Path) -> bool) -> MailforgeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(raise_error!(
            format!("directory not found: {}", dir.display()),
            ErrorCode::ResourceNotFound
        ));
    }
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && keep(&path) {
            entries.push(path);
        }
    }
    Ok(entries.into_iter().sorted().collect())
}

fn warn_invalid_addresses(role: &str, addresses: &[String]) {
    for address in addresses {
        if address.parse::<EmailAddress>().is_err() {
            warn!("{} entry '{}' is not a valid RFC address; keeping it anyway", role, address);
        }
    }
}
