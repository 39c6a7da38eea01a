//! Plugin marketplace pipeline for plugin-market
//!
//! Every plugin lives in its own directory under the plugins root and is
//! described by a `plugin.json` manifest. This module reads those manifests,
//! checks them against the marketplace schema and the plugin's own files, and
//! assembles the valid ones into a single `plugins.json` index.
//!
//! # Architecture
//!
//! - **types**: Core data structures (`RawManifest`, `Category`, `ValidationReport`, `PluginOutcome`)
//! - **loader**: Plugin directory scanning and manifest reading
//! - **validator**: Schema and filesystem checks producing errors and warnings
//! - **index**: Defaults resolution, index entries and the index artifact
//!
//! # Plugin Directory Structure
//!
//! ```text
//! plugins/
//! ├── connection-stats/
//! │   ├── plugin.json
//! │   ├── README.md
//! │   └── assets/
//! │       ├── icon.png
//! │       └── stats.js
//! └── ban-sync/
//!     ├── plugin.json
//!     └── main.go
//! ```
//!
//! # Example plugin.json
//!
//! ```json
//! {
//!   "id": "connection-stats",
//!   "name": "Connection Stats",
//!   "version": "1.2.0",
//!   "author": "ValwareIRC",
//!   "description": "Charts of client connections over time",
//!   "category": "monitoring",
//!   "hooks": ["overview_card", "user_connect"],
//!   "frontend_scripts": ["stats.js"],
//!   "tags": ["stats", "charts"]
//! }
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use plugin_market::plugins::{build_index, scan_plugins, write_index, ValidationProfile};
//!
//! let outcomes = scan_plugins(Path::new("plugins"), ValidationProfile::default(), &[]).unwrap();
//! let index = build_index(&outcomes, chrono::Utc::now()).unwrap();
//! write_index(&index, Path::new("plugins.json")).unwrap();
//!
//! println!("Indexed {} of {} plugins", index.plugin_count, outcomes.len());
//! ```

pub mod index;
mod loader;
pub mod types;
pub mod validator;

pub use index::{
    build_index, category_table, write_index, CategoryInfo, IndexEntry, MarketplaceIndex,
    ResolvedManifest, INDEX_FILE,
};
pub use loader::{load_plugin, read_manifest, scan_plugins, ManifestReadError};
pub use types::{
    Category, PluginOutcome, RawManifest, ValidationError, ValidationProfile, ValidationReport,
    ValidationWarning, MANIFEST_FILE,
};
pub use validator::validate_manifest;
