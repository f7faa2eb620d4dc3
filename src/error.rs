//! Error types for the release pipeline.
//!
//! Each stage defines its own error enum next to its code; this module
//! aggregates them for the top-level CLI surface.

use thiserror::Error;

/// Result type alias for release operations
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// Main error type covering every stage of the pipeline
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// module.json missing, malformed or incomplete
    #[error("Manifest error: {0}")]
    Manifest(#[from] crate::manifest::ManifestError),

    /// The wasm toolchain could not be run or exited non-zero
    #[error("Build error: {0}")]
    Build(#[from] crate::bundler::toolchain::BuildError),

    /// Archive assembly failed
    #[error("Assembly error: {0}")]
    Assemble(#[from] crate::bundler::archive::AssembleError),

    /// The watch loop could not be started or lost its watcher
    #[error("Watch error: {0}")]
    Watch(#[from] crate::bundler::watch::WatchError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
