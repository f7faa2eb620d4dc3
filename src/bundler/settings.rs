//! Packaging plan and module layout.
//!
//! Everything that ends up in a release archive is named here; a file this
//! plan does not mention is not packaged.

use std::path::{Path, PathBuf};

/// Package name of the wasm crate in `rust/`. wasm-pack derives its output
/// filenames from this, independently of the module manifest.
pub const WASM_CRATE_NAME: &str = "gridless_pathfinding";

/// Declarative list of what goes into a release archive.
#[derive(Debug, Clone)]
pub struct ArchiveSpec {
    /// Files taken from the module root, stored by basename
    pub root_files: Vec<PathBuf>,
    /// Directories copied recursively with their structure preserved
    pub copy_dirs: Vec<PathBuf>,
    /// Toolchain output filenames expected in the build directory
    pub wasm_outputs: Vec<String>,
    /// In-archive directory the toolchain outputs are placed under
    pub wasm_dir: PathBuf,
}

impl Default for ArchiveSpec {
    fn default() -> Self {
        Self {
            root_files: vec![
                PathBuf::from("module.json"),
                PathBuf::from("README.md"),
                PathBuf::from("CHANGELOG.md"),
                PathBuf::from("LICENSE"),
            ],
            copy_dirs: vec![
                PathBuf::from("js"),
                PathBuf::from("lang"),
                PathBuf::from("templates"),
            ],
            wasm_outputs: vec![
                format!("{WASM_CRATE_NAME}_bg.wasm"),
                format!("{WASM_CRATE_NAME}.js"),
            ],
            wasm_dir: PathBuf::from("wasm"),
        }
    }
}

/// Resolved locations inside the module source tree.
#[derive(Debug, Clone)]
pub struct Settings {
    root_dir: PathBuf,
    archive: ArchiveSpec,
}

impl Settings {
    /// Settings rooted at `root_dir` with the default packaging plan.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            archive: ArchiveSpec::default(),
        }
    }

    /// Module root directory (holds `module.json`)
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path to `module.json`
    pub fn manifest_path(&self) -> PathBuf {
        self.root_dir.join("module.json")
    }

    /// Directory of the wasm crate compiled by the toolchain
    pub fn rust_dir(&self) -> PathBuf {
        self.root_dir.join("rust")
    }

    /// Where release archives are written
    pub fn output_dir(&self) -> PathBuf {
        self.root_dir.join("artifact")
    }

    /// Fixed build output directory used by the watch loop. Shares its name
    /// with [`ArchiveSpec::wasm_dir`] but lives in the source tree, not in
    /// the archive.
    pub fn dev_out_dir(&self) -> PathBuf {
        self.root_dir.join("wasm")
    }

    /// The packaging plan
    pub fn archive_spec(&self) -> &ArchiveSpec {
        &self.archive
    }
}
