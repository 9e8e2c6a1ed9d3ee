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

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::modules::corpus::ContentPools;
use crate::modules::engine::config::GenerationConfig;
use crate::modules::engine::message::{Assembler, ComposeRequest};
use crate::modules::engine::schedule::{sample_business_weighted, sample_uniform};
use crate::modules::engine::selector::{draw_attachment_count, SelectionMode, Selector, Slot};
use crate::modules::error::code::ErrorCode;
use crate::modules::error::MailforgeResult;
use crate::modules::utils::strip_html;
use crate::raise_error;

/// The external persistence seam: the engine emits ready-to-persist bytes
/// plus a target name and never touches the output filesystem itself.
pub trait MessageWriter {
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> MailforgeResult<()>;
}

/// Runs the full generation loop and returns the number of messages written.
///
/// Exactly `num_emails` iterations; the first writer failure aborts the run
/// and output persisted so far stays in place.
pub fn run(
    config: &GenerationConfig,
    pools: &ContentPools,
    writer: &mut dyn MessageWriter,
) -> MailforgeResult<u64> {
    let mut rng = match config.seed {
        Some(seed) => {
            info!("random seed set to {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let mut selector = Selector::new(config.selection_mode);
    let mut assembler = Assembler::new();

    let html_probability = f64::from(config.html_pct) / 100.0;
    let attach_probability = f64::from(config.attach_pct) / 100.0;
    let total = config.num_emails;

    info!("generating {} emails", total);
    debug!(
        "HTML probability: {:.2}, attachment probability: {:.2}, selection mode: {}",
        html_probability, attach_probability, config.selection_mode
    );
    if let (Some(range), Some(business)) = (&config.date_range, &config.business) {
        info!(
            "randomizing dates between {} and {} (UTC)",
            range.start.to_rfc3339(),
            range.end.to_rfc3339()
        );
        info!(
            "time-of-day weighting: {}% within {} UTC",
            business.bias_pct, business.window
        );
    }

    for index in 1..=total {
        let sender = selector.choose(Slot::Sender, &pools.senders, &mut rng)?;
        let recipient = selector.choose(Slot::Recipient, &pools.recipients, &mut rng)?;

        let mut use_html =
            rng.random::<f64>() < html_probability && !pools.html_bodies.is_empty();
        let mut text_body = String::new();
        let mut html_body: Option<String> = None;

        if use_html {
            let path = selector.choose(Slot::HtmlBody, &pools.html_bodies, &mut rng)?;
            match load_template(path) {
                Ok(content) => html_body = Some(content),
                Err(error) => {
                    warn!("failed to load HTML template '{}': {:?}", path.display(), error);
                    use_html = false;
                }
            }
        }
        if !use_html {
            if !pools.text_bodies.is_empty() {
                let path = selector.choose(Slot::TextBody, &pools.text_bodies, &mut rng)?;
                match load_template(path) {
                    Ok(content) => text_body = content,
                    Err(error) => {
                        warn!("failed to load text body '{}': {:?}", path.display(), error);
                    }
                }
            } else {
                // No plain-text pool at all: strip a selected HTML sample and
                // send the result as a text-only message.
                let path = selector.choose(Slot::HtmlBody, &pools.html_bodies, &mut rng)?;
                match load_template(path) {
                    Ok(content) => text_body = strip_html(&content),
                    Err(error) => {
                        warn!(
                            "failed to load fallback HTML '{}': {:?}",
                            path.display(),
                            error
                        );
                    }
                }
            }
        }

        let mut attachment_paths: Vec<PathBuf> = Vec::new();
        if !pools.attachments.is_empty() && rng.random::<f64>() < attach_probability {
            let count = draw_attachment_count(&mut rng, config.max_attachments);
            match config.selection_mode {
                SelectionMode::Linear => {
                    for _ in 0..count {
                        attachment_paths.push(
                            selector
                                .choose(Slot::Attachment, &pools.attachments, &mut rng)?
                                .clone(),
                        );
                    }
                }
                SelectionMode::Random => {
                    if count <= pools.attachments.len() {
                        attachment_paths = pools
                            .attachments
                            .choose_multiple(&mut rng, count)
                            .cloned()
                            .collect();
                    } else {
                        attachment_paths = pools.attachments.clone();
                        while attachment_paths.len() < count {
                            let extra = rng.random_range(0..pools.attachments.len());
                            attachment_paths.push(pools.attachments[extra].clone());
                        }
                    }
                }
            }
        }

        let send_time = config.date_range.as_ref().map(|range| match &config.business {
            Some(business) => sample_business_weighted(&mut rng, range, business),
            None => sample_uniform(&mut rng, range),
        });

        let message = assembler.assemble(
            &mut rng,
            ComposeRequest {
                sender,
                recipient,
                use_html,
                subject_len: config.subject_len,
                text_body,
                html_body,
                attachment_paths,
                relay_hosts: &pools.relay_hosts,
                send_time,
            },
        );
        let bytes = message.to_bytes()?;
        writer.persist(&artifact_name(index), &bytes)?;

        if index % 100 == 0 || index == total {
            info!("wrote {}/{} emails", index, total);
        }
    }

    Ok(total)
}

/// Sequential, zero-padded output name for the i-th message (1-based).
pub fn artifact_name(index: u64) -> String {
    format!("email_{:06}.eml", index)
}

fn load_template(path: &Path) -> MailforgeResult<String> {
    let raw = fs::read(path).map_err(|e| {
        raise_error!(
            format!("failed to read '{}': {}", path.display(), e),
            ErrorCode::TemplateLoad
        )
    })?;
    Ok(String::from_utf8_lossy(&raw).into_owned())
}
