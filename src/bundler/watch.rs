//! Watch mode for automatic wasm rebuilds on source changes.
//!
//! Watches the wasm crate's directory and reruns the toolchain into the
//! fixed `wasm/` output directory on every change batch. Failed builds are
//! reported and the loop keeps going; the loop only ends on external
//! interruption or if the watcher itself dies.

use crate::bundler::settings::Settings;
use crate::bundler::toolchain::{BuildRequest, ToolchainRunner};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebouncedEventKind, new_debouncer};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Debounce window for change batches
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Errors during watch-loop setup or operation
#[derive(Error, Debug)]
pub enum WatchError {
    /// The wasm crate directory is missing
    #[error("source directory not found: {0}")]
    SourceNotFound(PathBuf),

    /// The file watcher could not be started
    #[error("file watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// The event channel closed, meaning the watcher thread is gone
    #[error("watch event channel closed")]
    ChannelClosed,

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Watch the wasm crate and rebuild on every change.
///
/// Runs one build immediately, then blocks on the change-event channel.
/// Builds are serialized by the loop itself: the next batch is not
/// consumed until the current compile finishes, so toolchain invocations
/// never overlap on the shared output directory. Build failures are
/// per-cycle and non-fatal.
///
/// Never returns normally; the `Infallible` success type records that.
pub async fn watch_and_rebuild<R: ToolchainRunner>(
    settings: &Settings,
    runner: &R,
    debug: bool,
) -> Result<Infallible, WatchError> {
    let source_dir = settings.rust_dir();
    if !source_dir.is_dir() {
        return Err(WatchError::SourceNotFound(source_dir));
    }

    let out_dir = settings.dev_out_dir();
    tokio::fs::create_dir_all(&out_dir).await?;

    // Bridge the watcher's callback thread into the async loop.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut debouncer = new_debouncer(DEBOUNCE, move |result| {
        let _ = tx.send(result);
    })?;
    debouncer
        .watcher()
        .watch(&source_dir, RecursiveMode::Recursive)?;

    let request = BuildRequest {
        source_dir: source_dir.clone(),
        out_dir,
        debug,
    };

    run_cycle(runner, &request).await;
    log::info!("watching {} for changes", source_dir.display());

    loop {
        match rx.recv().await {
            Some(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    matches!(event.kind, DebouncedEventKind::Any)
                        && is_relevant(&source_dir, &event.path)
                });
                if relevant {
                    run_cycle(runner, &request).await;
                    log::info!("watching {} for changes", source_dir.display());
                }
            }
            Some(Err(error)) => {
                // Watcher hiccup; keep watching.
                log::warn!("watch error: {error}");
            }
            None => return Err(WatchError::ChannelClosed),
        }
    }
}

/// One rebuild cycle. Failures are reported, never propagated.
async fn run_cycle<R: ToolchainRunner>(runner: &R, request: &BuildRequest) {
    match runner.build(request).await {
        Ok(()) => log::info!("build finished"),
        Err(error) => log::warn!("build failed: {error}"),
    }
}

/// Whether a changed path should trigger a rebuild.
///
/// The toolchain writes into `target/` and `pkg/` inside the crate while
/// compiling; reacting to those would rebuild forever.
fn is_relevant(source_dir: &Path, path: &Path) -> bool {
    for skipped in ["target", "pkg"] {
        if path.starts_with(source_dir.join(skipped)) {
            return false;
        }
    }
    true
}
