//! Plugin discovery and manifest reading for plugin-market
//!
//! This module enumerates plugin directories under the plugins root, reads
//! each directory's `plugin.json`, and runs the validator over it. Reader
//! failures never escape as errors: they become a single synthetic
//! validation error on that plugin's outcome.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::error::{MarketError, Result};

use super::types::{
    PluginOutcome, RawManifest, ValidationError, ValidationProfile, ValidationReport,
    MANIFEST_FILE,
};
use super::validator::validate_manifest;

/// Why a plugin's manifest could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestReadError {
    /// No `plugin.json` in the directory.
    #[error("No plugin.json found in {0}")]
    NotFound(String),

    /// The file exists but is not a JSON object.
    #[error("{0}")]
    Parse(String),

    /// The file exists but could not be read.
    #[error("Failed to read plugin.json: {0}")]
    Io(String),
}

impl From<ManifestReadError> for ValidationError {
    fn from(err: ManifestReadError) -> Self {
        match err {
            ManifestReadError::NotFound(_) => ValidationError::MissingManifest,
            ManifestReadError::Parse(message) | ManifestReadError::Io(message) => {
                ValidationError::InvalidManifestSyntax { message }
            }
        }
    }
}

/// Read and parse the `plugin.json` in `dir`.
///
/// # Errors
/// - `ManifestReadError::NotFound` if the directory has no `plugin.json`
/// - `ManifestReadError::Parse` if the file is not JSON or not a JSON object
/// - `ManifestReadError::Io` if the file cannot be read
pub fn read_manifest(dir: &Path) -> std::result::Result<RawManifest, ManifestReadError> {
    let manifest_path = dir.join(MANIFEST_FILE);

    if !manifest_path.is_file() {
        return Err(ManifestReadError::NotFound(dir.display().to_string()));
    }

    let content =
        fs::read_to_string(&manifest_path).map_err(|e| ManifestReadError::Io(e.to_string()))?;

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(fields)) => Ok(RawManifest::new(fields)),
        Ok(_) => Err(ManifestReadError::Parse(
            "top-level value must be a JSON object".to_string(),
        )),
        Err(e) => Err(ManifestReadError::Parse(e.to_string())),
    }
}

/// Read and validate a single plugin directory.
///
/// `id` is the directory name and becomes the expected manifest id.
pub fn load_plugin(dir: &Path, id: &str, profile: ValidationProfile) -> PluginOutcome {
    match read_manifest(dir) {
        Ok(manifest) => {
            let report = validate_manifest(&manifest, id, dir, profile);
            PluginOutcome {
                id: id.to_string(),
                dir: dir.to_path_buf(),
                manifest: Some(manifest),
                report,
            }
        }
        Err(e) => {
            debug!(plugin = %id, error = %e, "Manifest could not be read");
            PluginOutcome {
                id: id.to_string(),
                dir: dir.to_path_buf(),
                manifest: None,
                report: ValidationReport::from_error(e.into()),
            }
        }
    }
}

/// Scan every plugin directory under `root`.
///
/// Immediate subdirectories are candidates; hidden entries (leading `.`) and
/// plain files are skipped. Candidates are processed in byte-wise name order
/// and each yields exactly one outcome. When `only` is non-empty, directories
/// whose names are not listed are skipped.
///
/// # Errors
/// Returns `MarketError::Io` if `root` or one of its entries cannot be read.
/// Per-plugin problems are recorded in the outcomes instead.
pub fn scan_plugins(
    root: &Path,
    profile: ValidationProfile,
    only: &[String],
) -> Result<Vec<PluginOutcome>> {
    let entries = fs::read_dir(root).map_err(|e| {
        MarketError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read plugins directory {}: {}", root.display(), e),
        ))
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if name.starts_with('.') {
            continue;
        }
        if !entry.path().is_dir() {
            continue;
        }
        if !only.is_empty() && !only.iter().any(|id| id == &name) {
            continue;
        }

        candidates.push((name, entry.path()));
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(candidates
        .into_iter()
        .map(|(name, path)| load_plugin(&path, &name, profile))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn valid_manifest(id: &str) -> Value {
        json!({
            "id": id,
            "name": format!("Plugin {}", id),
            "version": "1.0.0",
            "author": "Tester",
            "description": "A plugin used by the loader tests"
        })
    }

    fn write_plugin(root: &Path, dir_name: &str, manifest: &Value) -> PathBuf {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(manifest).unwrap(),
        )
        .unwrap();
        dir
    }

    // ---- read_manifest tests ----

    #[test]
    fn test_read_manifest_valid() {
        let tmp = TempDir::new().unwrap();
        let dir = write_plugin(tmp.path(), "demo", &valid_manifest("demo"));

        let manifest = read_manifest(&dir).unwrap();
        assert_eq!(manifest.str_field("id"), Some("demo"));
        assert_eq!(manifest.str_field("version"), Some("1.0.0"));
    }

    #[test]
    fn test_read_manifest_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = read_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, ManifestReadError::NotFound(_)));
        assert!(err.to_string().contains("No plugin.json found"));
    }

    #[test]
    fn test_read_manifest_malformed_json() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "{ broken json").unwrap();

        let err = read_manifest(tmp.path()).unwrap_err();
        match err {
            ManifestReadError::Parse(message) => assert!(!message.is_empty()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_manifest_non_object() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "[1, 2, 3]").unwrap();

        let err = read_manifest(tmp.path()).unwrap_err();
        assert_eq!(
            err,
            ManifestReadError::Parse("top-level value must be a JSON object".to_string())
        );
    }

    #[test]
    fn test_read_manifest_keeps_unknown_fields() {
        let tmp = TempDir::new().unwrap();
        let mut manifest = valid_manifest("demo");
        manifest["email"] = json!("plugins@example.org");
        let dir = write_plugin(tmp.path(), "demo", &manifest);

        let raw = read_manifest(&dir).unwrap();
        assert_eq!(raw.str_field("email"), Some("plugins@example.org"));
    }

    // ---- load_plugin tests ----

    #[test]
    fn test_load_plugin_missing_manifest_is_synthetic_error() {
        let tmp = TempDir::new().unwrap();
        let outcome = load_plugin(tmp.path(), "empty", ValidationProfile::default());
        assert!(outcome.manifest.is_none());
        assert_eq!(outcome.report.errors, vec![ValidationError::MissingManifest]);
        assert!(outcome.report.warnings.is_empty());
    }

    #[test]
    fn test_load_plugin_bad_syntax_bypasses_validator() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "{ \"id\": }").unwrap();

        let outcome = load_plugin(tmp.path(), "broken", ValidationProfile::strict());
        assert_eq!(outcome.report.errors.len(), 1);
        assert_eq!(outcome.report.errors[0].code(), "InvalidManifestSyntax");
        // strict review warnings would fire for a missing README if the
        // validator had run
        assert!(outcome.report.warnings.is_empty());
    }

    // ---- scan_plugins tests ----

    #[test]
    fn test_scan_empty_root() {
        let tmp = TempDir::new().unwrap();
        let outcomes = scan_plugins(tmp.path(), ValidationProfile::default(), &[]).unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_fatal() {
        let result = scan_plugins(
            Path::new("/nonexistent/plugin-market/plugins"),
            ValidationProfile::default(),
            &[],
        );
        assert!(matches!(result, Err(MarketError::Io(_))));
    }

    #[test]
    fn test_scan_skips_hidden_entries_and_files() {
        let tmp = TempDir::new().unwrap();
        write_plugin(tmp.path(), ".git", &valid_manifest("git"));
        fs::write(tmp.path().join("README.md"), "# Plugins").unwrap();
        write_plugin(tmp.path(), "demo", &valid_manifest("demo"));

        let outcomes = scan_plugins(tmp.path(), ValidationProfile::default(), &[]).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].id, "demo");
    }

    #[test]
    fn test_scan_one_outcome_per_directory_in_name_order() {
        let tmp = TempDir::new().unwrap();
        write_plugin(tmp.path(), "zeta", &valid_manifest("zeta"));
        fs::create_dir(tmp.path().join("no-manifest")).unwrap();
        let dir = tmp.path().join("alpha");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), "not json").unwrap();

        let outcomes = scan_plugins(tmp.path(), ValidationProfile::default(), &[]).unwrap();
        let ids: Vec<&str> = outcomes.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "no-manifest", "zeta"]);

        assert_eq!(outcomes[0].report.errors[0].code(), "InvalidManifestSyntax");
        assert_eq!(outcomes[1].report.errors, vec![ValidationError::MissingManifest]);
        assert!(outcomes[2].is_valid());
    }

    #[test]
    fn test_scan_invalid_plugin_does_not_affect_others() {
        let tmp = TempDir::new().unwrap();
        write_plugin(tmp.path(), "good", &valid_manifest("good"));
        write_plugin(tmp.path(), "bad", &valid_manifest("not-bad"));

        let outcomes = scan_plugins(tmp.path(), ValidationProfile::default(), &[]).unwrap();
        let valid: Vec<&str> = outcomes
            .iter()
            .filter(|o| o.is_valid())
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(valid, vec!["good"]);
        assert_eq!(outcomes[0].report.errors[0].code(), "IdMismatch");
    }

    #[test]
    fn test_scan_with_id_filter() {
        let tmp = TempDir::new().unwrap();
        write_plugin(tmp.path(), "one", &valid_manifest("one"));
        write_plugin(tmp.path(), "two", &valid_manifest("two"));

        let outcomes =
            scan_plugins(tmp.path(), ValidationProfile::default(), &["two".to_string()]).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].id, "two");
    }
}
