//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI parser for `recap`.
#[derive(Debug, Parser)]
#[command(
    name = "recap",
    version,
    about = "Generate numbered natural-language descriptions from recorded UI sessions"
)]
pub struct Cli {
    /// Path to an optional YAML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Process a specific recording instead of the latest one.
    #[arg(long, value_name = "INT")]
    pub recording_id: Option<i64>,

    /// Overwrite an existing output file without asking.
    #[arg(long)]
    pub force: bool,

    /// Ask the model to vet the finished description list before saving.
    #[arg(long)]
    pub validate: bool,

    /// Suppress console output below warnings and skip interactive prompts.
    #[arg(long)]
    pub quiet: bool,
}
