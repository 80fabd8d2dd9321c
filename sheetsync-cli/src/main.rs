//! Sheetsync — sync record streams into remote workbook tables.
//!
//! # Usage
//!
//! ```text
//! sheetsync run --config config.json [--input records.jsonl]
//! sheetsync check --config config.json
//! ```
//!
//! `run` reads JSONL messages (`RECORD`, `SCHEMA`, `STATE`) from stdin or a
//! file, buffers records per stream, and flushes batches to the workbook.

mod commands;
mod messages;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check::CheckArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sheetsync",
    version,
    about = "Sync record streams into tables of a remote workbook",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read JSONL messages and sync them into the workbook.
    Run(RunArgs),

    /// Verify credentials and workbook addressing.
    Check(CheckArgs),
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Check(args) => args.run(),
    }
}
