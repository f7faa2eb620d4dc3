//! Release archive assembly.
//!
//! The packaging plan is first walked into a flat entry list, then the zip
//! is written in one pass. Planning and compression stay separate so the
//! traversal is testable on its own, and so every missing input surfaces
//! before a single archive byte exists on disk.

use crate::bundler::settings::ArchiveSpec;
use crate::manifest::ModuleManifest;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors while planning or writing the release archive
#[derive(Error, Debug)]
pub enum AssembleError {
    /// An input named by the packaging plan does not exist
    #[error("missing input file: {path}")]
    MissingInput {
        /// The absent path
        path: PathBuf,
    },

    /// A packaged directory contains something that is not a regular file
    /// or directory; the archive must contain only real files
    #[error("not a regular file: {path}")]
    NotAFile {
        /// The offending path
        path: PathBuf,
    },

    /// Directory traversal failed
    #[error("traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    /// An entry path could not be relativized against the module root
    #[error("path prefix error: {0}")]
    Prefix(#[from] std::path::StripPrefixError),

    /// Archive encoding failed
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The archive write task was cancelled or panicked
    #[error("archive write task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// One file headed into the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Where the file lives on disk
    pub source: PathBuf,
    /// Where it ends up inside the archive; `/`-separated and rooted at
    /// the module name
    pub archive_path: String,
}

/// Output filename for a release archive.
pub fn archive_filename(manifest: &ModuleManifest) -> String {
    format!("{}-{}.zip", manifest.name, manifest.version)
}

/// Compute the complete entry list for one release archive.
///
/// Entries come from three sources: fixed root files stored by basename,
/// copy-everything directories stored with their relative structure
/// intact, and the toolchain outputs from `build_dir` placed under the
/// fixed wasm directory. The result is sorted by archive path so entry
/// order does not depend on filesystem listing order.
///
/// # Errors
///
/// A file the plan names that is absent yields
/// [`AssembleError::MissingInput`]. A directory entry that is neither a
/// regular file nor a directory yields [`AssembleError::NotAFile`].
pub fn plan_entries(
    manifest: &ModuleManifest,
    spec: &ArchiveSpec,
    root_dir: &Path,
    build_dir: &Path,
) -> Result<Vec<ArchiveEntry>, AssembleError> {
    let mut entries = Vec::new();

    for file in &spec.root_files {
        let source = root_dir.join(file);
        if !source.is_file() {
            return Err(AssembleError::MissingInput { path: source });
        }
        let basename = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| AssembleError::MissingInput {
                path: source.clone(),
            })?;
        entries.push(ArchiveEntry {
            archive_path: format!("{}/{}", manifest.name, basename),
            source,
        });
    }

    for dir in &spec.copy_dirs {
        collect_directory(manifest, root_dir, dir, &mut entries)?;
    }

    for output in &spec.wasm_outputs {
        let source = build_dir.join(output);
        if !source.is_file() {
            return Err(AssembleError::MissingInput { path: source });
        }
        entries.push(ArchiveEntry {
            archive_path: format!(
                "{}/{}/{}",
                manifest.name,
                spec.wasm_dir.display(),
                output
            ),
            source,
        });
    }

    entries.sort_by(|a, b| a.archive_path.cmp(&b.archive_path));
    Ok(entries)
}

/// Recursively collect one copy-everything directory.
fn collect_directory(
    manifest: &ModuleManifest,
    root_dir: &Path,
    dir: &Path,
    entries: &mut Vec<ArchiveEntry>,
) -> Result<(), AssembleError> {
    let dir_path = root_dir.join(dir);
    if !dir_path.is_dir() {
        return Err(AssembleError::MissingInput { path: dir_path });
    }

    for entry in walkdir::WalkDir::new(&dir_path).follow_links(false) {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            return Err(AssembleError::NotAFile {
                path: entry.path().to_path_buf(),
            });
        }

        debug_assert!(entry.path().starts_with(&dir_path));
        let rel = entry.path().strip_prefix(root_dir)?;

        // In-archive paths always use forward slashes.
        let mut archive_path = manifest.name.clone();
        for component in rel.components() {
            archive_path.push('/');
            archive_path.push_str(&component.as_os_str().to_string_lossy());
        }

        entries.push(ArchiveEntry {
            source: entry.path().to_path_buf(),
            archive_path,
        });
    }

    Ok(())
}

/// Assemble one release archive and return its path.
///
/// The zip is written under a temporary name and renamed into place once
/// closed, so a crash mid-write never leaves a discoverable half-archive.
/// Re-running the same version replaces that version's archive; nothing
/// else in `output_dir` is touched.
pub async fn assemble(
    manifest: &ModuleManifest,
    spec: &ArchiveSpec,
    root_dir: &Path,
    build_dir: &Path,
    output_dir: &Path,
) -> Result<PathBuf, AssembleError> {
    let entries = plan_entries(manifest, spec, root_dir, build_dir)?;

    tokio::fs::create_dir_all(output_dir).await?;

    let final_path = output_dir.join(archive_filename(manifest));
    let partial_path = final_path.with_extension("zip.partial");

    log::info!(
        "writing {} entries to {}",
        entries.len(),
        final_path.display()
    );

    // Blocking compression runs on the dedicated thread pool.
    let result = {
        let partial = partial_path.clone();
        let target = final_path.clone();
        tokio::task::spawn_blocking(move || write_archive(&entries, &partial, &target)).await?
    };

    if result.is_err() {
        // The output location must not contain anything a consumer could
        // mistake for a finished archive.
        match std::fs::remove_file(&partial_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("could not remove {}: {}", partial_path.display(), e),
        }
    }
    result?;

    Ok(final_path)
}

/// Write all entries to `partial_path`, then rename onto `final_path`.
fn write_archive(
    entries: &[ArchiveEntry],
    partial_path: &Path,
    final_path: &Path,
) -> Result<(), AssembleError> {
    let file = File::create(partial_path)?;
    let mut writer = ZipWriter::new(file);

    for entry in entries {
        writer.start_file(entry.archive_path.as_str(), file_options())?;
        let mut source = File::open(&entry.source)?;
        io::copy(&mut source, &mut writer)?;
    }

    writer.finish()?;
    std::fs::rename(partial_path, final_path)?;
    Ok(())
}

/// Deflate at the maximum level.
fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9))
}
