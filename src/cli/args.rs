//! Command line argument parsing.

use clap::{Parser, Subcommand};

/// Release tooling for the gridless_pathfinding module
#[derive(Parser, Debug)]
#[command(
    name = "gridless_pathfinding_release",
    version,
    about = "Release bundler for the gridless_pathfinding Foundry VTT module",
    long_about = "Compiles the wasm pathfinder with wasm-pack and packages the module for release.

Run from the module root (the directory containing module.json).

Usage:
  gridless_pathfinding_release release
  gridless_pathfinding_release watch --debug

Exit code 0 = the release archive exists at the printed path."
)]
pub struct Args {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the wasm crate and assemble the release archive in artifact/
    Release,

    /// Recompile the wasm crate into wasm/ on every source change
    Watch {
        /// Build without optimizations for faster turnaround
        #[arg(long)]
        debug: bool,
    },
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watch_accepts_the_debug_flag() {
        let args = Args::try_parse_from(["gridless_pathfinding_release", "watch", "--debug"])
            .unwrap();
        assert!(matches!(args.command, Command::Watch { debug: true }));
    }

    #[test]
    fn release_takes_no_arguments() {
        let args = Args::try_parse_from(["gridless_pathfinding_release", "release"]).unwrap();
        assert!(matches!(args.command, Command::Release));

        let err = Args::try_parse_from(["gridless_pathfinding_release", "release", "--debug"]);
        assert!(err.is_err());
    }

    #[test]
    fn a_subcommand_is_required() {
        assert!(Args::try_parse_from(["gridless_pathfinding_release"]).is_err());
    }
}
