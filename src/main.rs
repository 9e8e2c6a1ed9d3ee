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


use clap::Parser;
use mimalloc::MiMalloc;
use tracing::{debug, error, info};

use crate::modules::corpus::{ContentPools, CorpusPaths};
use crate::modules::engine::config::GenerationConfig;
use crate::modules::engine::run::run;
use crate::modules::error::MailforgeResult;
use crate::modules::logger;
use crate::modules::output::EmlDirWriter;
use crate::modules::settings::cli::Settings;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
                   _  _   __
  _ __ ___   __ _ (_)| | / _|  ___   _ __  __ _   ___
 | '_ ` _ \ / _` || || || |_  / _ \ | '__|/ _` | / _ \
 | | | | | | (_| || || ||  _|| (_) || |  | (_| ||  __/
 |_| |_| |_|\__,_||_||_||_|   \___/ |_|   \__, | \___|
                                          |___/
"#;

fn main() {
    let settings = Settings::parse();
    let _guard = logger::initialize_logging(&settings);
    info!("{}", LOGO);
    info!("Starting mailforge");
    info!("Version:  {}", env!("CARGO_PKG_VERSION"));

    if let Err(error) = generate(&settings) {
        error!("{:?}", error);
        std::process::exit(error.exit_code());
    }
}

fn generate(settings: &Settings) -> MailforgeResult<()> {
    let config = GenerationConfig::resolve(settings)?;
    debug!("resolved configuration: {:?}", config);

    let pools = ContentPools::load(&CorpusPaths::from_settings(settings))?;
    pools.warn_gaps(&config);

    let mut writer = EmlDirWriter::create(&config.output_dir)?;
    info!(
        "generating {} emails into '{}'",
        config.num_emails,
        config.output_dir.display()
    );

    let written = run(&config, &pools, &mut writer)?;
    info!("generation complete: {} messages written", written);
    Ok(())
}
