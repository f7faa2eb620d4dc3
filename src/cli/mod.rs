//! Command line interface for the release bundler.

mod args;
pub mod commands;

pub use args::{Args, Command};

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();

    match args.command {
        Command::Release => commands::release().await,
        Command::Watch { debug } => commands::watch(debug).await,
    }
}
