//! Marketplace index assembly.
//!
//! Turns validated plugins into the `plugins.json` document the panel reads.
//! Optional manifest fields get their defaults in exactly one place,
//! [`ResolvedManifest`], before being flattened into an [`IndexEntry`].

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{MarketError, Result};

use super::types::{Category, PluginOutcome, MANIFEST_FILE};
use super::validator::ASSETS_DIR;

/// Schema version of the generated index document.
pub const INDEX_SCHEMA_VERSION: u32 = 2;

/// Default output file name, written at the repository root.
pub const INDEX_FILE: &str = "plugins.json";

const DEFAULT_LICENSE: &str = "MIT";

/// A validated manifest with every optional field defaulted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolvedManifest {
    pub id: String,
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,

    #[serde(default = "default_license", deserialize_with = "null_as_license")]
    pub license: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub min_panel_version: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub hooks: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub nav_items: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub dashboard_cards: Vec<Value>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub frontend_scripts: Vec<String>,

    #[serde(default)]
    pub settings_schema: Option<Value>,
}

impl ResolvedManifest {
    /// Apply defaults to a manifest that has already passed validation.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Source link shown by the marketplace: `repository`, else `homepage`.
    pub fn repository_url(&self) -> Option<&str> {
        self.repository.as_deref().or(self.homepage.as_deref())
    }
}

fn default_license() -> String {
    DEFAULT_LICENSE.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_license<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_license))
}

/// One plugin as listed in the marketplace index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub version: String,
    pub author: String,
    pub description: String,
    pub category: Category,
    pub license: String,
    pub tags: Vec<String>,
    pub repository: Option<String>,
    pub homepage: Option<String>,
    pub min_panel_version: Option<String>,
    pub hooks: Vec<String>,
    pub nav_items: Vec<Value>,
    pub dashboard_cards: Vec<Value>,
    pub frontend_scripts: Vec<String>,
    pub settings_schema: Option<Value>,
    pub has_readme: bool,
    pub has_icon: bool,
    pub last_updated: String,
    /// Filled in by the download counter service, not by this pipeline.
    pub downloads: u64,
    pub rating: u32,
    pub rating_count: u32,
}

impl IndexEntry {
    /// Combine a resolved manifest with facts read from the plugin directory.
    pub fn from_resolved(manifest: ResolvedManifest, plugin_dir: &Path) -> Result<Self> {
        let manifest_path = plugin_dir.join(MANIFEST_FILE);
        let modified = fs::metadata(&manifest_path)
            .and_then(|m| m.modified())
            .map_err(|e| {
                MarketError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to read modification time of {}: {}",
                        manifest_path.display(),
                        e
                    ),
                ))
            })?;

        let repository = manifest.repository_url().map(str::to_string);

        Ok(Self {
            id: manifest.id,
            name: manifest.name,
            version: manifest.version,
            author: manifest.author,
            description: manifest.description,
            category: manifest.category,
            license: manifest.license,
            tags: manifest.tags,
            repository,
            homepage: manifest.homepage,
            min_panel_version: manifest.min_panel_version,
            hooks: manifest.hooks,
            nav_items: manifest.nav_items,
            dashboard_cards: manifest.dashboard_cards,
            frontend_scripts: manifest.frontend_scripts,
            settings_schema: manifest.settings_schema,
            has_readme: plugin_dir.join("README.md").is_file(),
            has_icon: plugin_dir.join(ASSETS_DIR).join("icon.png").is_file(),
            last_updated: format_timestamp(DateTime::<Utc>::from(modified)),
            downloads: 0,
            rating: 0,
            rating_count: 0,
        })
    }
}

/// Static metadata for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub name: String,
    pub description: String,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            id: category,
            name: category.display_name().to_string(),
            description: category.description().to_string(),
        }
    }
}

/// Every category, whether or not any plugin uses it.
pub fn category_table() -> Vec<CategoryInfo> {
    Category::ALL.iter().copied().map(CategoryInfo::from).collect()
}

/// The root `plugins.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketplaceIndex {
    pub version: u32,
    pub generated_at: String,
    pub plugin_count: usize,
    pub categories: Vec<CategoryInfo>,
    pub plugins: Vec<IndexEntry>,
}

/// Build the index from scan outcomes.
///
/// Outcomes with errors are skipped. Entries are ordered by name,
/// case-insensitively; plugins with equal names keep their scan order.
///
/// # Errors
/// Fails only on environment problems, such as an unreadable manifest
/// modification time.
pub fn build_index<'a, I>(outcomes: I, generated_at: DateTime<Utc>) -> Result<MarketplaceIndex>
where
    I: IntoIterator<Item = &'a PluginOutcome>,
{
    let mut plugins = Vec::new();

    for outcome in outcomes {
        if !outcome.is_valid() {
            continue;
        }
        let Some(manifest) = outcome.manifest.clone() else {
            continue;
        };

        let resolved = ResolvedManifest::from_value(manifest.into_value())?;
        plugins.push(IndexEntry::from_resolved(resolved, &outcome.dir)?);
    }

    plugins.sort_by_cached_key(|entry| entry.name.to_lowercase());

    Ok(MarketplaceIndex {
        version: INDEX_SCHEMA_VERSION,
        generated_at: format_timestamp(generated_at),
        plugin_count: plugins.len(),
        categories: category_table(),
        plugins,
    })
}

/// Write the index as pretty-printed JSON, creating parent directories.
pub fn write_index(index: &MarketplaceIndex, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            MarketError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create output directory {}: {}",
                    parent.display(),
                    e
                ),
            ))
        })?;
    }

    let mut json = serde_json::to_string_pretty(index)?;
    json.push('\n');

    fs::write(path, json).map_err(|e| {
        MarketError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write index to {}: {}", path.display(), e),
        ))
    })?;

    Ok(())
}

/// RFC 3339 UTC with millisecond precision, e.g. `2026-01-02T03:04:05.678Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
