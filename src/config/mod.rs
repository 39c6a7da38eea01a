//! Configuration for plugin-market
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional JSON config file, `PLUGIN_MARKET_*` environment variables, and
//! finally command-line flags applied by the binary.
//!
//! # Example `plugin-market.json`
//!
//! ```json
//! {
//!   "plugins_dir": "plugins",
//!   "output": "plugins.json",
//!   "strict": false,
//!   "log_format": "pretty"
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MarketError, Result};

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "plugin-market.json";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "PLUGIN_MARKET_";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(MarketError::Config(format!(
                "unknown log format '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Root directory holding one subdirectory per plugin.
    pub plugins_dir: PathBuf,

    /// Where the index artifact is written.
    pub output: PathBuf,

    /// Run `validate` with review checks and blocking warnings.
    pub strict: bool,

    pub log_format: LogFormat,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from("plugins"),
            output: PathBuf::from(crate::plugins::INDEX_FILE),
            strict: false,
            log_format: LogFormat::default(),
        }
    }
}

impl MarketConfig {
    /// Load configuration.
    ///
    /// With `path`, that file must exist and parse. Without it,
    /// [`DEFAULT_CONFIG_FILE`] is read if present in the working directory.
    /// Environment overrides are applied on top in both cases.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a JSON config file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(MarketError::NotFound(format!(
                "config file {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            MarketError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            MarketError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// Apply `PLUGIN_MARKET_*` overrides using `lookup` to read variables.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(dir) = var("PLUGINS_DIR") {
            self.plugins_dir = PathBuf::from(dir);
        }
        if let Some(output) = var("OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Some(strict) = var("STRICT") {
            self.strict = parse_bool(&strict).ok_or_else(|| {
                MarketError::Config(format!(
                    "{}STRICT must be true/false, got '{}'",
                    ENV_PREFIX, strict
                ))
            })?;
        }
        if let Some(format) = var("LOG_FORMAT") {
            self.log_format = format.parse()?;
        }

        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
