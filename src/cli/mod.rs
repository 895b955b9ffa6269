//! Command-line parsing for the generation-series compiler.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline code. Defaults that come from the environment are resolved in
//! `app`, not here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_DATASET_TAG, DEFAULT_LINE_LOSS, DEFAULT_TRANSFORMER_LOSS, Decision, FileOrder};

pub mod prompt;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "energy-compiler",
    version,
    about = "Compile yearly generation exports into one loss-adjusted series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Normalize and merge every matching raw file, apply losses, print a summary.
    Compile(CompileArgs),
    /// Show which raw files a dataset tag selects, in concatenation order.
    List(ListArgs),
}

/// Options shared by every subcommand that selects raw files.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Directory holding the raw yearly exports.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: PathBuf,

    /// Dataset tag; files whose name contains it are selected.
    #[arg(short = 't', long, default_value = DEFAULT_DATASET_TAG)]
    pub tag: String,

    /// Concatenation order of the matched files.
    #[arg(long, value_enum, default_value_t = FileOrder::Period)]
    pub order: FileOrder,
}

/// Options for `compile`.
#[derive(Debug, Parser, Clone)]
pub struct CompileArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// High-voltage transformer loss rate, in [0, 1).
    #[arg(long, default_value_t = DEFAULT_TRANSFORMER_LOSS)]
    pub transformer_loss: f64,

    /// Transmission line loss rate, in [0, 1).
    #[arg(long, default_value_t = DEFAULT_LINE_LOSS)]
    pub line_loss: f64,

    /// Save the compiled series under `<output-root>/data/output/`.
    #[arg(short = 's', long)]
    pub save: bool,

    /// What to do if the compiled output already exists (asks when omitted).
    #[arg(long, value_enum)]
    pub on_existing: Option<Decision>,

    /// Root directory of `data/output/` (default: $ENERGY_OUTPUT_ROOT or the current directory).
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Options for `list`.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
