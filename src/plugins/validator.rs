//! Manifest validation rules.
//!
//! Every rule runs regardless of earlier failures so a single pass reports
//! every defect. Errors and warnings are appended in rule order, which keeps
//! reports stable across runs.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::security::resolve_in_dir;

use super::types::{
    Category, RawManifest, ValidationError, ValidationProfile, ValidationReport,
    ValidationWarning, KNOWN_HOOKS,
};

/// Required manifest fields, in reporting order.
pub const REQUIRED_FIELDS: &[&str] = &["id", "name", "version", "author", "description"];

pub const ID_MIN_LEN: usize = 2;
pub const ID_MAX_LEN: usize = 50;
pub const MAX_TAGS: usize = 10;
pub const RECOMMENDED_TAGS: usize = 5;

/// Directory holding frontend scripts and the icon.
pub const ASSETS_DIR: &str = "assets";

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("id pattern"));

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?$").expect("version pattern")
});

const STRING_ARRAY: &str = "an array of strings";

/// Validate a parsed manifest against the marketplace schema.
///
/// `expected_id` is the plugin's directory name and `plugin_dir` the directory
/// that `entry_point` and `assets/` paths are resolved against.
pub fn validate_manifest(
    manifest: &RawManifest,
    expected_id: &str,
    plugin_dir: &Path,
    profile: ValidationProfile,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_required_fields(manifest, &mut report);
    check_id(manifest, expected_id, &mut report);
    check_version(manifest, &mut report);
    check_category(manifest, &mut report);
    check_description(manifest, profile, &mut report);
    check_entry_point(manifest, plugin_dir, &mut report);
    check_frontend_scripts(manifest, plugin_dir, &mut report);
    check_hooks(manifest, &mut report);
    check_tags(manifest, &mut report);
    check_passthrough_types(manifest, &mut report);

    if profile.strict {
        check_review_files(manifest, plugin_dir, &mut report);
    }

    report
}

/// Returns true when `version` matches `MAJOR.MINOR.PATCH[-prerelease]`.
pub fn is_valid_version(version: &str) -> bool {
    VERSION_RE.is_match(version)
}

/// Returns true when `id` has the allowed character set (length not checked).
pub fn is_valid_id_format(id: &str) -> bool {
    ID_RE.is_match(id)
}

fn check_required_fields(manifest: &RawManifest, report: &mut ValidationReport) {
    for field in REQUIRED_FIELDS {
        match manifest.get(field) {
            None | Some(Value::Null) => report.error(missing(field)),
            Some(Value::String(s)) if s.trim().is_empty() => report.error(missing(field)),
            Some(Value::String(_)) => {}
            Some(_) => report.error(wrong_type(field, "a string")),
        }
    }
}

fn check_id(manifest: &RawManifest, expected_id: &str, report: &mut ValidationReport) {
    let Some(id) = manifest.str_field("id").filter(|s| !s.trim().is_empty()) else {
        return;
    };

    if id != expected_id {
        report.error(ValidationError::IdMismatch {
            expected: expected_id.to_string(),
            found: id.to_string(),
        });
    }

    if !is_valid_id_format(id) {
        report.error(ValidationError::InvalidIdFormat { id: id.to_string() });
    }

    let len = id.chars().count();
    if !(ID_MIN_LEN..=ID_MAX_LEN).contains(&len) {
        report.error(ValidationError::InvalidIdLength {
            id: id.to_string(),
            len,
            min: ID_MIN_LEN,
            max: ID_MAX_LEN,
        });
    }
}

fn check_version(manifest: &RawManifest, report: &mut ValidationReport) {
    if let Some(version) = manifest.str_field("version").filter(|s| !s.trim().is_empty()) {
        if !is_valid_version(version) {
            report.error(ValidationError::InvalidVersion {
                version: version.to_string(),
            });
        }
    }
}

fn check_category(manifest: &RawManifest, report: &mut ValidationReport) {
    if let Some(category) = manifest.str_field("category") {
        if category.parse::<Category>().is_err() {
            let allowed: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
            report.error(ValidationError::InvalidCategory {
                category: category.to_string(),
                allowed: allowed.join(", "),
            });
        }
    }
}

fn check_description(
    manifest: &RawManifest,
    profile: ValidationProfile,
    report: &mut ValidationReport,
) {
    let Some(description) = manifest
        .str_field("description")
        .filter(|s| !s.trim().is_empty())
    else {
        return;
    };

    let len = description.trim().chars().count();
    let max = profile.description_max();
    if len < ValidationProfile::DESCRIPTION_MIN {
        report.error(ValidationError::DescriptionTooShort {
            len,
            min: ValidationProfile::DESCRIPTION_MIN,
        });
    } else if len > max {
        report.error(ValidationError::DescriptionTooLong { len, max });
    }
}

fn check_entry_point(manifest: &RawManifest, plugin_dir: &Path, report: &mut ValidationReport) {
    if let Some(entry_point) = manifest.str_field("entry_point") {
        if resolve_in_dir(plugin_dir, entry_point).is_none() {
            report.error(ValidationError::EntryPointNotFound {
                path: entry_point.to_string(),
            });
        }
    }
}

fn check_frontend_scripts(
    manifest: &RawManifest,
    plugin_dir: &Path,
    report: &mut ValidationReport,
) {
    let Some(Value::Array(scripts)) = manifest.get("frontend_scripts") else {
        return;
    };

    let assets = plugin_dir.join(ASSETS_DIR);
    for script in scripts.iter().filter_map(Value::as_str) {
        if resolve_in_dir(&assets, script).is_none() {
            report.error(ValidationError::ScriptNotFound {
                name: script.to_string(),
            });
        }
    }
}

fn check_hooks(manifest: &RawManifest, report: &mut ValidationReport) {
    let Some(Value::Array(hooks)) = manifest.get("hooks") else {
        return;
    };

    for hook in hooks.iter().filter_map(Value::as_str) {
        if !KNOWN_HOOKS.contains(&hook) {
            report.warn(ValidationWarning::UnknownHook {
                name: hook.to_string(),
            });
        }
    }
}

fn check_tags(manifest: &RawManifest, report: &mut ValidationReport) {
    if manifest.is_absent("tags") {
        return;
    }

    let Some(tags) = string_array(manifest.get("tags")) else {
        report.error(wrong_type("tags", STRING_ARRAY));
        return;
    };

    let count = tags.len();
    if count > MAX_TAGS {
        report.error(ValidationError::TooManyTags {
            count,
            max: MAX_TAGS,
        });
    } else if count > RECOMMENDED_TAGS {
        report.warn(ValidationWarning::TagsAboveRecommended {
            count,
            recommended: RECOMMENDED_TAGS,
        });
    }
}

/// Type checks for optional fields that are copied into the index as-is.
fn check_passthrough_types(manifest: &RawManifest, report: &mut ValidationReport) {
    for field in [
        "category",
        "license",
        "repository",
        "homepage",
        "min_panel_version",
        "entry_point",
    ] {
        if !manifest.is_absent(field) && manifest.str_field(field).is_none() {
            report.error(wrong_type(field, "a string"));
        }
    }

    for field in ["hooks", "frontend_scripts"] {
        if !manifest.is_absent(field) && string_array(manifest.get(field)).is_none() {
            report.error(wrong_type(field, STRING_ARRAY));
        }
    }

    for field in ["nav_items", "dashboard_cards"] {
        if !manifest.is_absent(field) && !matches!(manifest.get(field), Some(Value::Array(_))) {
            report.error(wrong_type(field, "an array"));
        }
    }

    if !matches!(
        manifest.get("settings_schema"),
        None | Some(Value::Null) | Some(Value::Object(_))
    ) {
        report.error(wrong_type("settings_schema", "an object or null"));
    }
}

/// Review-only checks: documentation files and https source links.
fn check_review_files(manifest: &RawManifest, plugin_dir: &Path, report: &mut ValidationReport) {
    if !plugin_dir.join("README.md").is_file() {
        report.warn(ValidationWarning::MissingReadme);
    }

    if !plugin_dir.join("LICENSE").is_file() {
        report.warn(ValidationWarning::MissingLicenseFile);
    }

    let url = manifest
        .str_field("repository")
        .or_else(|| manifest.str_field("homepage"));
    if let Some(url) = url {
        if !url.starts_with("https://") {
            report.warn(ValidationWarning::InsecureRepositoryUrl {
                url: url.to_string(),
            });
        }
    }
}

fn string_array(value: Option<&Value>) -> Option<Vec<&str>> {
    match value {
        Some(Value::Array(items)) => items.iter().map(Value::as_str).collect(),
        _ => None,
    }
}

fn missing(field: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
    }
}

fn wrong_type(field: &str, expected: &str) -> ValidationError {
    ValidationError::InvalidFieldType {
        field: field.to_string(),
        expected: expected.to_string(),
    }
}
