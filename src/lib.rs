//! plugin-market - Validation and index builder for an IRC panel plugin marketplace
//!
//! Scans a directory of plugin folders, validates each `plugin.json`
//! manifest, and writes the consolidated `plugins.json` index consumed by
//! the panel's marketplace view.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod plugins;
pub mod security;

pub use config::MarketConfig;
pub use error::{MarketError, Result};
