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

use chrono::{DateTime, Utc};
use mail_builder::headers::date::Date;
use mail_builder::headers::raw::Raw;
use mail_builder::MessageBuilder;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::warn;

use crate::modules::engine::relay::build_chain;
use crate::modules::error::code::ErrorCode;
use crate::modules::error::{MailforgeError, MailforgeResult};
use crate::modules::utils::{sanitize_subject, strip_html};
use crate::raise_error;

const FALLBACK_SUBJECT: &str = "No subject";
const FALLBACK_TEXT: &str = "(no text)";
const PRODUCT_IDENT: &str = concat!("mailforge/", env!("CARGO_PKG_VERSION"));

/// One embedded file, content type already resolved.
#[derive(Clone, Debug)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Everything the assembler needs for one message. Bodies are passed as
/// loaded strings; attachments as paths so read failures can be recovered
/// here (skip the attachment, keep the message).
#[derive(Debug)]
pub struct ComposeRequest<'a> {
    pub sender: &'a str,
    pub recipient: &'a str,
    pub use_html: bool,
    pub subject_len: usize,
    pub text_body: String,
    pub html_body: Option<String>,
    pub attachment_paths: Vec<PathBuf>,
    pub relay_hosts: &'a [String],
    pub send_time: Option<DateTime<Utc>>,
}

/// A fully assembled message, immutable once built; `to_bytes` serializes it
/// into RFC 5322 form and the object is then discarded.
#[derive(Clone, Debug)]
pub struct ComposedMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub attachments: Vec<Attachment>,
    pub trace_headers: Vec<String>,
    pub message_id: String,
    pub date: DateTime<Utc>,
}

impl ComposedMessage {
    pub fn to_bytes(&self) -> MailforgeResult<Vec<u8>> {
        let mut builder = MessageBuilder::new();
        for line in &self.trace_headers {
            builder = builder.header("Received", Raw::new(line.as_str()));
        }
        builder = builder
            .from(self.sender.as_str())
            .to(self.recipient.as_str())
            .message_id(self.message_id.as_str())
            .date(Date::new(self.date.timestamp()))
            .header("X-Mailer", Raw::new(PRODUCT_IDENT))
            .subject(self.subject.as_str())
            .text_body(self.text_body.as_str());
        if let Some(html) = &self.html_body {
            builder = builder.html_body(html.as_str());
        }
        for attachment in &self.attachments {
            builder = builder.attachment(
                attachment.content_type.as_str(),
                attachment.filename.as_str(),
                attachment.data.as_slice(),
            );
        }
        builder.write_to_vec().map_err(|e| {
            raise_error!(
                format!("failed to serialize message: {}", e),
                ErrorCode::MessageBuild
            )
        })
    }
}

/// Turns selections into `ComposedMessage`s. Holds the run-wide sequence
/// counter that keeps Message-IDs unique even under a fixed seed.
pub struct Assembler {
    sequence: u64,
}

impl Assembler {
    pub fn new() -> Self {
        Assembler { sequence: 0 }
    }

    pub fn assemble(&mut self, rng: &mut StdRng, request: ComposeRequest<'_>) -> ComposedMessage {
        self.sequence += 1;
        let date = request.send_time.unwrap_or_else(Utc::now);

        let trace_headers: Vec<String> = build_chain(rng, request.relay_hosts, date)
            .iter()
            .map(|hop| hop.render())
            .collect();

        let use_html = request.use_html && request.html_body.is_some();
        let subject_source = match (&request.html_body, use_html) {
            (Some(html), true) => strip_html(html),
            _ => request.text_body.clone(),
        };
        let truncated: String = subject_source.chars().take(request.subject_len).collect();
        let mut subject = sanitize_subject(&truncated);
        if subject.is_empty() {
            subject = FALLBACK_SUBJECT.to_string();
        }

        let (text_body, html_body) = if use_html {
            // html_body is present whenever use_html holds.
            let html = request.html_body.unwrap_or_default();
            let fallback = if request.text_body.is_empty() {
                strip_html(&html)
            } else {
                request.text_body
            };
            (non_empty_or(fallback, FALLBACK_TEXT), Some(html))
        } else {
            (non_empty_or(request.text_body, FALLBACK_TEXT), None)
        };

        let mut attachments = Vec::with_capacity(request.attachment_paths.len());
        for path in &request.attachment_paths {
            match read_attachment(path) {
                Ok(attachment) => attachments.push(attachment),
                Err(error) => {
                    warn!("skipping attachment '{}': {:?}", path.display(), error);
                }
            }
        }

        // A monotonic sequence plus a draw from the shared generator: unique
        // within a run, reproducible across seeded runs, independent of the
        // wall clock.
        let message_id = format!(
            "{:06x}.{:016x}@{}",
            self.sequence,
            rng.random::<u64>(),
            domain_of(request.sender)
        );

        ComposedMessage {
            sender: request.sender.to_string(),
            recipient: request.recipient.to_string(),
            subject,
            text_body,
            html_body,
            attachments,
            trace_headers,
            message_id,
            date,
        }
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn read_attachment(path: &Path) -> MailforgeResult<Attachment> {
    let data = fs::read(path).map_err(|e| -> MailforgeError {
        raise_error!(
            format!("failed to read '{}': {}", path.display(), e),
            ErrorCode::AttachmentRead
        )
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    Ok(Attachment {
        filename,
        content_type,
        data,
    })
}

fn domain_of(address: &str) -> &str {
    match address.split_once('@') {
        Some((_, domain)) => domain,
        None => "localhost",
    }
}
