// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! tessel: developer CLI for the echo-tessel spatial executor.
//!
//! Inspects partition plans and runs each demo against its sequential twin.
//! Flags override the defaults stored in `tessel.json`.

mod cli;
mod commands;
mod config;

use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use echo_tessel::ExecutorConfig;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

use crate::cli::{Cli, Command, ConfigCommand, GlobalArgs};
use crate::config::{CliConfig, ConfigService, FsConfigStore, CONFIG_KEY};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let store = match &cli.global.config_dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new()?,
    };
    let service = ConfigService::new(store);
    let stored: CliConfig = service
        .load(CONFIG_KEY)
        .context("loading stored config")?
        .unwrap_or_default();
    let settings = Settings::resolve(&cli.global, &stored)?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("installing tracing subscriber")?;
    debug!(?settings, "resolved settings");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Command::Plan(args) => {
            commands::run_plan(&mut out, args, settings.parallel, settings.executor)
        }
        Command::Gray(args) => commands::run_gray(&mut out, args, settings.parallel),
        Command::CountWindows(args) => {
            commands::run_count_windows(&mut out, args, settings.parallel)
        }
        Command::Spectrum(args) => commands::run_spectrum(&mut out, args, settings.parallel),
        Command::Around(args) => commands::run_around(&mut out, args, settings.parallel),
        Command::Config(ConfigCommand::Show) => {
            serde_json::to_writer_pretty(&mut out, &stored)?;
            writeln!(out)?;
            Ok(())
        }
        Command::Config(ConfigCommand::Set) => {
            let updated = stored.merged_with(&cli.global);
            service.save(CONFIG_KEY, &updated).context("saving config")?;
            serde_json::to_writer_pretty(&mut out, &updated)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

/// Effective settings after layering flags over stored config.
#[derive(Debug, Clone, Copy)]
struct Settings {
    parallel: usize,
    executor: ExecutorConfig,
    log_level: Level,
}

impl Settings {
    fn resolve(flags: &GlobalArgs, stored: &CliConfig) -> Result<Self> {
        let parallel = flags
            .parallel
            .or(stored.parallel)
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from));
        let level_name = flags
            .log_level
            .as_deref()
            .or(stored.log_level.as_deref())
            .unwrap_or("warn");
        let log_level = Level::from_str(level_name)
            .with_context(|| format!("unknown log level {level_name:?}"))?;
        let executor = ExecutorConfig {
            max_threads: flags.max_threads.or(stored.max_threads),
        };
        Ok(Self {
            parallel,
            executor,
            log_level,
        })
    }
}

impl CliConfig {
    /// Overlays the flags given on this invocation.
    fn merged_with(&self, flags: &GlobalArgs) -> Self {
        Self {
            parallel: flags.parallel.or(self.parallel),
            max_threads: flags.max_threads.or(self.max_threads),
            log_level: flags.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }
}
