//! Module identity from `module.json`.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors while loading the module manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file is missing or unreadable
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path that was attempted
        path: String,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The manifest is not valid JSON or misses a required field
    #[error("failed to parse module.json: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required field is present but unusable
    #[error("invalid manifest field '{field}': {reason}")]
    InvalidField {
        /// Field name
        field: &'static str,
        /// What is wrong with the value
        reason: String,
    },
}

/// Identity fields of the module, read from `module.json`.
///
/// The manifest carries many more keys (title, description, compatibility
/// ranges); only `name` and `version` matter for packaging. `name` becomes
/// the archive's internal root directory and both fields together form the
/// output filename.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleManifest {
    /// Module identifier, used as the archive root directory name
    pub name: String,
    /// Module version, e.g. "1.2.0"
    pub version: String,
}

/// Load and validate the manifest at `path`.
///
/// # Errors
///
/// Fails if the file cannot be read, is not valid JSON, misses either
/// required field, or carries an empty or non-path-safe value. Nothing is
/// defaulted.
pub fn load(path: &Path) -> Result<ModuleManifest, ManifestError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let manifest: ModuleManifest = serde_json::from_str(&raw)?;
    validate(&manifest)?;
    Ok(manifest)
}

fn validate(manifest: &ModuleManifest) -> Result<(), ManifestError> {
    if manifest.name.is_empty() {
        return Err(ManifestError::InvalidField {
            field: "name",
            reason: "must not be empty".to_string(),
        });
    }

    // The name becomes a single archive path component.
    if manifest.name.contains(['/', '\\']) || manifest.name == "." || manifest.name == ".." {
        return Err(ManifestError::InvalidField {
            field: "name",
            reason: format!("'{}' is not usable as a directory name", manifest.name),
        });
    }

    if manifest.version.is_empty() {
        return Err(ManifestError::InvalidField {
            field: "version",
            reason: "must not be empty".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("module.json");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_name_and_version() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(
            &dir,
            r#"{"name": "gridless_pathfinding", "version": "1.2.0", "title": "Pathfinding"}"#,
        );

        let manifest = load(&path).unwrap();
        assert_eq!(manifest.name, "gridless_pathfinding");
        assert_eq!(manifest.version, "1.2.0");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let result = load(&dir.path().join("module.json"));
        assert!(matches!(result, Err(ManifestError::Read { .. })));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, "{not json");
        assert!(matches!(load(&path), Err(ManifestError::Parse(_))));
    }

    #[test]
    fn missing_version_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"name": "gridless_pathfinding"}"#);
        assert!(matches!(load(&path), Err(ManifestError::Parse(_))));
    }

    #[test]
    fn empty_name_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"name": "", "version": "1.0.0"}"#);
        assert!(matches!(
            load(&path),
            Err(ManifestError::InvalidField { field: "name", .. })
        ));
    }

    #[test]
    fn name_with_separator_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"name": "a/b", "version": "1.0.0"}"#);
        assert!(matches!(
            load(&path),
            Err(ManifestError::InvalidField { field: "name", .. })
        ));
    }

    #[test]
    fn empty_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_manifest(&dir, r#"{"name": "mod", "version": ""}"#);
        assert!(matches!(
            load(&path),
            Err(ManifestError::InvalidField { field: "version", .. })
        ));
    }
}
