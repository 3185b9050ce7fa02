//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use eyre::Result;

#[derive(Debug, Parser)]
#[command(name = "weave")]
#[command(about = "Subtitle stitching and transcript-guided correction")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Merge per-clip subtitles into one SRT timeline
    Stitch(crate::stitch::Args),

    /// Correct an SRT file against a reference transcript
    Correct(crate::correct::Args),

    /// Stitch clips and correct the result, saving artifacts per session
    Run(crate::run::Args),
}

/// Execute CLI command - separated for testing.
pub fn run_cli(cli: Cli) -> Result<()> {
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        Commands::Stitch(args) => crate::stitch::execute(args.try_into()?),
        Commands::Correct(args) => crate::correct::execute(args.try_into()?),
        Commands::Run(args) => crate::run::execute(args.try_into()?),
    }
}
