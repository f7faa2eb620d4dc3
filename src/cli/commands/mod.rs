//! Release and watch command implementations.

use crate::bundler::settings::Settings;
use crate::bundler::toolchain::{BuildRequest, ToolchainRunner, WasmPack};
use crate::bundler::{archive, checksum, watch};
use crate::error::Result;
use crate::manifest;
use std::path::PathBuf;

/// Build the wasm crate and assemble the release archive.
///
/// Exit code 0 guarantees the archive exists at the printed path.
pub async fn release() -> Result<i32> {
    let settings = Settings::new(".");
    let runner = WasmPack::locate()?;

    let archive_path = run_release(&settings, &runner).await?;

    println!("Successfully built {}", archive_path.display());
    Ok(0)
}

/// The release pipeline: manifest, compile, assemble. Fully sequential.
///
/// The toolchain writes into a scoped temporary directory that is removed
/// on every exit path once this function returns, build failure included.
/// The archive only comes into existence after a successful compile.
pub async fn run_release<R: ToolchainRunner>(
    settings: &Settings,
    runner: &R,
) -> Result<PathBuf> {
    let manifest = manifest::load(&settings.manifest_path())?;
    log::info!("packaging {} {}", manifest.name, manifest.version);

    let build_dir = tempfile::tempdir()?;

    runner
        .build(&BuildRequest {
            source_dir: settings.rust_dir(),
            out_dir: build_dir.path().to_path_buf(),
            debug: false,
        })
        .await?;

    let archive_path = archive::assemble(
        &manifest,
        settings.archive_spec(),
        settings.root_dir(),
        build_dir.path(),
        &settings.output_dir(),
    )
    .await?;

    let digest = checksum::file_sha256(&archive_path).await?;
    log::info!("sha256 {digest}");

    Ok(archive_path)
}

/// Rebuild the wasm crate on every source change, until interrupted.
pub async fn watch(debug: bool) -> Result<i32> {
    let settings = Settings::new(".");
    let runner = WasmPack::locate()?;

    match watch::watch_and_rebuild(&settings, &runner, debug).await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::settings::WASM_CRATE_NAME;
    use crate::bundler::toolchain::BuildError;
    use crate::error::ReleaseError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Writes the two expected toolchain outputs instead of compiling.
    struct RecordingToolchain;

    impl ToolchainRunner for RecordingToolchain {
        async fn build(&self, request: &BuildRequest) -> Result<(), BuildError> {
            fs::write(
                request.out_dir.join(format!("{WASM_CRATE_NAME}_bg.wasm")),
                b"\0asm",
            )
            .unwrap();
            fs::write(
                request.out_dir.join(format!("{WASM_CRATE_NAME}.js")),
                "export default init;",
            )
            .unwrap();
            Ok(())
        }
    }

    struct BrokenToolchain;

    impl ToolchainRunner for BrokenToolchain {
        async fn build(&self, _request: &BuildRequest) -> Result<(), BuildError> {
            Err(BuildError::Spawn {
                tool: "fake".to_string(),
                source: std::io::Error::other("compile error"),
            })
        }
    }

    fn build_module_tree(root: &Path) {
        fs::write(
            root.join("module.json"),
            r#"{"name": "gridless_pathfinding", "version": "1.2.0"}"#,
        )
        .unwrap();
        for file in ["README.md", "CHANGELOG.md", "LICENSE"] {
            fs::write(root.join(file), file).unwrap();
        }
        for dir in ["js", "lang", "templates"] {
            fs::create_dir(root.join(dir)).unwrap();
        }
        fs::write(root.join("js/main.js"), "export {};").unwrap();
        fs::write(root.join("lang/en.json"), "{}").unwrap();
        fs::write(root.join("templates/settings.hbs"), "<div></div>").unwrap();
        fs::create_dir(root.join("rust")).unwrap();
    }

    #[tokio::test]
    async fn release_pipeline_produces_the_versioned_archive() {
        let dir = TempDir::new().unwrap();
        build_module_tree(dir.path());
        let settings = Settings::new(dir.path());

        let archive_path = run_release(&settings, &RecordingToolchain).await.unwrap();

        assert_eq!(
            archive_path,
            dir.path().join("artifact/gridless_pathfinding-1.2.0.zip")
        );
        assert!(archive_path.is_file());
    }

    #[tokio::test]
    async fn build_failure_leaves_no_archive_behind() {
        let dir = TempDir::new().unwrap();
        build_module_tree(dir.path());
        let settings = Settings::new(dir.path());

        let result = run_release(&settings, &BrokenToolchain).await;

        assert!(matches!(result, Err(ReleaseError::Build(_))));
        assert!(!dir.path().join("artifact").exists());
    }

    #[tokio::test]
    async fn manifest_failure_happens_before_any_build() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::new(dir.path());

        let result = run_release(&settings, &BrokenToolchain).await;
        assert!(matches!(result, Err(ReleaseError::Manifest(_))));
    }
}
