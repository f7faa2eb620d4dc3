//! wasm toolchain invocation.
//!
//! Both pipelines funnel compiles through the [`ToolchainRunner`] seam so
//! the orchestration around them can be exercised against a fake runner.

use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors from invoking the wasm toolchain
#[derive(Error, Debug)]
pub enum BuildError {
    /// wasm-pack is not installed or not on PATH
    #[error("wasm-pack not found: {0}")]
    ToolNotFound(#[from] which::Error),

    /// The toolchain process could not be started
    #[error("failed to launch {tool}: {source}")]
    Spawn {
        /// Program that was invoked
        tool: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The toolchain ran and exited non-zero
    #[error("{tool} exited with {status}")]
    Failed {
        /// Program that was invoked
        tool: String,
        /// Exit status of the child process
        status: ExitStatus,
    },
}

/// A single compile request.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Directory of the wasm crate
    pub source_dir: PathBuf,
    /// Directory the toolchain writes its outputs to
    pub out_dir: PathBuf,
    /// Skip optimizations for faster turnaround
    pub debug: bool,
}

/// Capability to compile the wasm crate.
pub trait ToolchainRunner {
    /// Run one compile, blocking until the toolchain exits.
    ///
    /// Succeeds iff the exit status is zero. Failures are deterministic
    /// compile errors and are never retried.
    fn build(&self, request: &BuildRequest) -> impl Future<Output = Result<(), BuildError>>;
}

/// The production toolchain: `wasm-pack build --target web`.
#[derive(Debug, Clone)]
pub struct WasmPack {
    program: PathBuf,
}

impl WasmPack {
    /// Locate wasm-pack on PATH.
    pub fn locate() -> Result<Self, BuildError> {
        let program = which::which("wasm-pack")?;
        log::debug!("using wasm-pack at {}", program.display());
        Ok(Self { program })
    }

    /// Arguments for one compile. Kept separate from the spawn so the
    /// command line can be checked without running anything.
    fn command_args(request: &BuildRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "build".into(),
            "--target".into(),
            "web".into(),
            "--out-dir".into(),
            request.out_dir.clone().into_os_string(),
        ];
        if request.debug {
            args.push("--debug".into());
        }
        args.push(request.source_dir.clone().into_os_string());
        args
    }
}

impl ToolchainRunner for WasmPack {
    async fn build(&self, request: &BuildRequest) -> Result<(), BuildError> {
        log::info!(
            "compiling {} into {}",
            request.source_dir.display(),
            request.out_dir.display()
        );

        let status = tokio::process::Command::new(&self.program)
            .args(Self::command_args(request))
            .status()
            .await
            .map_err(|source| BuildError::Spawn {
                tool: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(BuildError::Failed {
                tool: "wasm-pack".to_string(),
                status,
            });
        }

        Ok(())
    }
}
