//! Command line interface for macpkg.

mod args;
pub mod commands;

pub use args::{BuildArgs, Cli, Command};

use crate::error::Result;
use clap::Parser;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(build_args) => commands::build(build_args).await?,
    }

    Ok(0)
}
