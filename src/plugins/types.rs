//! Plugin types for plugin-market
//!
//! This module defines the types shared by the reader, validator, scanner and
//! index assembler: the closed category set, the raw manifest view, and the
//! structured validation report.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// File name of the manifest inside each plugin directory.
pub const MANIFEST_FILE: &str = "plugin.json";

/// Hook names the panel currently dispatches. Anything else is reported as
/// an `UnknownHook` warning.
pub const KNOWN_HOOKS: &[&str] = &[
    "navbar",
    "footer",
    "overview_card",
    "user_lookup",
    "user_connect",
    "user_disconnect",
    "channel_create",
    "channel_destroy",
    "server_link",
    "server_unlink",
    "ban_add",
    "ban_remove",
    "settings_page",
];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Closed set of marketplace categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Integration,
    Monitoring,
    Management,
    #[default]
    Utilities,
    Appearance,
    Fun,
}

impl Category {
    /// Every category, in the order the index lists them.
    pub const ALL: [Category; 7] = [
        Category::Security,
        Category::Integration,
        Category::Monitoring,
        Category::Management,
        Category::Utilities,
        Category::Appearance,
        Category::Fun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Integration => "integration",
            Category::Monitoring => "monitoring",
            Category::Management => "management",
            Category::Utilities => "utilities",
            Category::Appearance => "appearance",
            Category::Fun => "fun",
        }
    }

    /// Human display name shown by the marketplace.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Integration => "Integration",
            Category::Monitoring => "Monitoring",
            Category::Management => "Management",
            Category::Utilities => "Utilities",
            Category::Appearance => "Appearance",
            Category::Fun => "Fun",
        }
    }

    /// One-line description shown under the category heading.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Security => "Access control, bans and abuse protection",
            Category::Integration => "Bridges to external services and APIs",
            Category::Monitoring => "Statistics, dashboards and network health",
            Category::Management => "Tools for operating users, channels and servers",
            Category::Utilities => "General-purpose helpers",
            Category::Appearance => "Themes and visual customization of the panel",
            Category::Fun => "Easter eggs and playful extras",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

// ---------------------------------------------------------------------------
// Raw manifest
// ---------------------------------------------------------------------------

/// A parsed but not yet validated `plugin.json`.
///
/// Kept as a JSON object rather than a typed struct so that a missing or
/// mistyped field becomes a validation error instead of a parse failure.
#[derive(Debug, Clone, PartialEq)]
pub struct RawManifest {
    fields: Map<String, Value>,
}

impl RawManifest {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value of a field; `None` when absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value when it is a JSON string.
    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// True when the field is absent or explicitly `null`.
    pub fn is_absent(&self, field: &str) -> bool {
        matches!(self.fields.get(field), None | Some(Value::Null))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Validation issues
// ---------------------------------------------------------------------------

/// A condition that excludes a plugin from the index.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code")]
pub enum ValidationError {
    #[error("plugin.json not found")]
    MissingManifest,

    #[error("plugin.json is not valid: {message}")]
    InvalidManifestSyntax { message: String },

    #[error("missing required field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' must be {expected}")]
    InvalidFieldType { field: String, expected: String },

    #[error("id '{found}' does not match directory name '{expected}'")]
    IdMismatch { expected: String, found: String },

    #[error("id '{id}' may only contain lowercase letters, digits and hyphens")]
    InvalidIdFormat { id: String },

    #[error("id '{id}' must be between {min} and {max} characters (got {len})")]
    InvalidIdLength {
        id: String,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("version '{version}' is not MAJOR.MINOR.PATCH[-prerelease]")]
    InvalidVersion { version: String },

    #[error("category '{category}' is not one of: {allowed}")]
    InvalidCategory { category: String, allowed: String },

    #[error("description is too short ({len} < {min} characters)")]
    DescriptionTooShort { len: usize, min: usize },

    #[error("description is too long ({len} > {max} characters)")]
    DescriptionTooLong { len: usize, max: usize },

    #[error("entry_point '{path}' does not exist in the plugin directory")]
    EntryPointNotFound { path: String },

    #[error("frontend script '{name}' does not exist in assets/")]
    ScriptNotFound { name: String },

    #[error("too many tags ({count} > {max})")]
    TooManyTags { count: usize, max: usize },
}

impl ValidationError {
    /// Stable identifier for reports and CI output.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingManifest => "MissingManifest",
            ValidationError::InvalidManifestSyntax { .. } => "InvalidManifestSyntax",
            ValidationError::MissingField { .. } => "MissingField",
            ValidationError::InvalidFieldType { .. } => "InvalidFieldType",
            ValidationError::IdMismatch { .. } => "IdMismatch",
            ValidationError::InvalidIdFormat { .. } => "InvalidIdFormat",
            ValidationError::InvalidIdLength { .. } => "InvalidIdLength",
            ValidationError::InvalidVersion { .. } => "InvalidVersion",
            ValidationError::InvalidCategory { .. } => "InvalidCategory",
            ValidationError::DescriptionTooShort { .. } => "DescriptionTooShort",
            ValidationError::DescriptionTooLong { .. } => "DescriptionTooLong",
            ValidationError::EntryPointNotFound { .. } => "EntryPointNotFound",
            ValidationError::ScriptNotFound { .. } => "ScriptNotFound",
            ValidationError::TooManyTags { .. } => "TooManyTags",
        }
    }
}

/// An advisory finding. Never excludes a plugin from the index.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code")]
pub enum ValidationWarning {
    #[error("unknown hook '{name}'")]
    UnknownHook { name: String },

    #[error("{count} tags; at most {recommended} are recommended")]
    TagsAboveRecommended { count: usize, recommended: usize },

    #[error("README.md is missing")]
    MissingReadme,

    #[error("LICENSE file is missing")]
    MissingLicenseFile,

    #[error("repository URL '{url}' does not use https")]
    InsecureRepositoryUrl { url: String },
}

impl ValidationWarning {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationWarning::UnknownHook { .. } => "UnknownHook",
            ValidationWarning::TagsAboveRecommended { .. } => "TagsAboveRecommended",
            ValidationWarning::MissingReadme => "MissingReadme",
            ValidationWarning::MissingLicenseFile => "MissingLicenseFile",
            ValidationWarning::InsecureRepositoryUrl { .. } => "InsecureRepositoryUrl",
        }
    }
}

/// Ordered errors and warnings for one plugin, in rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report holding a single error, used for reader failures.
    pub fn from_error(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn warn(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validation strictness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationProfile {
    /// Enables the README/LICENSE/https review checks and the tighter
    /// description limit.
    pub strict: bool,
}

impl ValidationProfile {
    pub const DESCRIPTION_MIN: usize = 10;
    pub const DESCRIPTION_MAX: usize = 500;
    pub const STRICT_DESCRIPTION_MAX: usize = 200;

    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn description_max(&self) -> usize {
        if self.strict {
            Self::STRICT_DESCRIPTION_MAX
        } else {
            Self::DESCRIPTION_MAX
        }
    }
}

// ---------------------------------------------------------------------------
// Scan outcome
// ---------------------------------------------------------------------------

/// Result of reading and validating one plugin directory.
#[derive(Debug, Clone)]
pub struct PluginOutcome {
    /// Directory name, which is the expected plugin id.
    pub id: String,

    /// The plugin directory.
    pub dir: PathBuf,

    /// The parsed manifest; `None` when the reader failed.
    pub manifest: Option<RawManifest>,

    pub report: ValidationReport,
}

impl PluginOutcome {
    pub fn is_valid(&self) -> bool {
        self.manifest.is_some() && self.report.is_valid()
    }

    /// Display name from the manifest, falling back to the directory name.
    pub fn display_name(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(|m| m.str_field("name"))
            .unwrap_or(&self.id)
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.as_ref().and_then(|m| m.str_field("version"))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
