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


use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::modules::settings::cli::Settings;

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. When file output is
/// enabled, log lines go to a daily-rolling file under the configured log
/// directory and the returned guard must stay alive for the process lifetime
/// so buffered lines are flushed on exit.
pub fn initialize_logging(settings: &Settings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.mailforge_log_level.clone()));

    if settings.mailforge_log_to_file {
        let appender =
            tracing_appender::rolling::daily(&settings.mailforge_log_dir, "mailforge.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        if settings.mailforge_json_logs {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
        }
        Some(guard)
    } else {
        if settings.mailforge_json_logs {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_ansi(false))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(settings.mailforge_ansi_logs))
                .with(filter)
                .init();
        }
        None
    }
}
