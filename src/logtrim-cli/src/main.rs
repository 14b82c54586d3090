//! Logtrim CLI - Main entry point.
//!
//! Deletes files matching a pattern so that the survivors stay within a count
//! or size limit while remaining logarithmically spaced in time.

use anyhow::Result;
use clap::Parser;

use logtrim_cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = cli.log_filter(|key| std::env::var(key).ok());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli.run()
}
