// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use echo_tessel::Strategy;

/// Partition 2D domains and run bounded-parallel demos.
#[derive(Parser, Debug)]
#[command(name = "tessel", author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand; they override stored config.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Concurrency budget: maximum actions running at once
    #[arg(short, long, global = true)]
    pub parallel: Option<usize>,

    /// Cap on worker threads per call
    #[arg(long, global = true)]
    pub max_threads: Option<usize>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Directory holding tessel.json (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the partition plan a strategy produces
    Plan(PlanArgs),
    /// Convert a PNG to grayscale using horizontal bands
    Gray(GrayArgs),
    /// Count occupied window tiles on a random boolean grid
    CountWindows(CountWindowsArgs),
    /// Compute grid block sums on a random grid
    Spectrum(SpectrumArgs),
    /// Compute per-cell neighborhood sums on a random grid
    Around(AroundArgs),
    /// Show or update stored defaults
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Horizontal,
    Vertical,
    Window,
    Grid,
    PerCell,
}

impl StrategyKind {
    /// Combines the kind with its size parameter.
    pub fn with_param(self, param: usize) -> Strategy {
        match self {
            Self::Horizontal => Strategy::Horizontal,
            Self::Vertical => Strategy::Vertical,
            Self::Window => Strategy::Window { window: param },
            Self::Grid => Strategy::Grid { size: param },
            Self::PerCell => Strategy::PerCell,
        }
    }
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Domain width
    #[arg(long)]
    pub width: usize,
    /// Domain height
    #[arg(long)]
    pub height: usize,
    /// Partitioning strategy
    #[arg(long, value_enum)]
    pub strategy: StrategyKind,
    /// Window or cell size (window and grid strategies)
    #[arg(long, default_value_t = 1)]
    pub size: usize,
    /// Emit JSON instead of a table
    #[arg(long, conflicts_with = "run")]
    pub json: bool,
    /// Also execute the plan with a counting action and report the fan-out
    #[arg(long)]
    pub run: bool,
}

#[derive(Args, Debug)]
pub struct GrayArgs {
    /// Input image
    #[arg(long)]
    pub input: PathBuf,
    /// Output PNG
    #[arg(long)]
    pub output: PathBuf,
    /// Also run the sequential twin and fail on mismatch
    #[arg(long)]
    pub check: bool,
}

/// Size and seed of a generated input grid.
#[derive(Args, Debug, Clone, Copy)]
pub struct GridArgs {
    /// Grid width
    #[arg(long, default_value_t = 100)]
    pub width: usize,
    /// Grid height
    #[arg(long, default_value_t = 100)]
    pub height: usize,
    /// RNG seed for the input fill
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
}

#[derive(Args, Debug)]
pub struct CountWindowsArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Tile edge length
    #[arg(long, default_value_t = 10)]
    pub window: usize,
    /// Probability that a cell is occupied
    #[arg(long, default_value_t = 0.01)]
    pub density: f64,
}

#[derive(Args, Debug)]
pub struct SpectrumArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Block edge length
    #[arg(long, default_value_t = 10)]
    pub size: usize,
}

#[derive(Args, Debug)]
pub struct AroundArgs {
    #[command(flatten)]
    pub grid: GridArgs,
    /// Neighborhood radius
    #[arg(long, default_value_t = 2)]
    pub radius: usize,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the stored defaults as JSON
    Show,
    /// Store the global flags given on this invocation as defaults
    Set,
}
