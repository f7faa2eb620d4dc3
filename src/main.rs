//! Release bundler for the gridless_pathfinding Foundry VTT module.
//!
//! This binary compiles the wasm pathfinder with wasm-pack and packages it
//! together with the module's scripts, translations and templates into a
//! distributable zip archive. It also provides a watch loop that rebuilds
//! the wasm crate on every source change during development.

mod bundler;
mod cli;
mod error;
mod manifest;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
