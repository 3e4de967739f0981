// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! psrx-run: headless driver for the CPU interpreter.
//!
//! Loads a BIOS image and runs the interpreter either for a fixed number
//! of instructions or until `Ctrl-C`.

use clap::Parser;
use psrx::config::Config;
use psrx::core::system::System;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "psrx-run", about = "Headless PSX CPU interpreter driver")]
struct Args {
    /// Path to a 512 KiB BIOS image.
    #[arg(long)]
    bios: Option<PathBuf>,

    /// Stop after this many instructions. Runs until Ctrl-C if omitted.
    #[arg(long)]
    max_steps: Option<u64>,

    /// Path to a TOML config file, merged under these CLI flags.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides RUST_LOG (e.g. "trace", "debug", "warn").
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .merge_cli(args.bios.clone(), args.max_steps, args.log_level.clone());

    let level = config.log_level.clone().unwrap_or_else(|| "info".into());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&level)).init();

    let bios_path = config
        .bios_path
        .ok_or("no BIOS path given (pass --bios or set bios_path in --config)")?;

    log::info!("loading BIOS from {}", bios_path.display());
    let mut system = System::new();
    system.load_bios(&bios_path.to_string_lossy())?;

    match config.max_steps {
        Some(max_steps) => {
            log::info!("running for {max_steps} instructions");
            for _ in 0..max_steps {
                system.step()?;
            }
        }
        None => {
            log::info!("running until Ctrl-C");
            loop {
                system.step()?;
            }
        }
    }

    log::info!(
        "stopped after {} instructions, pc=0x{:08X}",
        system.cycles(),
        system.pc()
    );
    Ok(())
}
