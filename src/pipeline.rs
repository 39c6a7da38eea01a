//! Pipeline driver: scan, validate, assemble, write.
//!
//! Each run starts from scratch. Outcomes are owned by the returned summary
//! and nothing survives between runs.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{MarketError, Result};
use crate::plugins::{
    build_index, scan_plugins, write_index, MarketplaceIndex, PluginOutcome, ValidationError,
    ValidationProfile, ValidationReport,
};

/// Per-plugin outcomes of one run and the verdict derived from them.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub outcomes: Vec<PluginOutcome>,

    /// Warnings block the run.
    pub warnings_block: bool,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.report.warnings.len()).sum()
    }

    /// True when no plugin has errors and, if warnings block, none has
    /// warnings either.
    pub fn passed(&self) -> bool {
        self.invalid_count() == 0 && !(self.warnings_block && self.warning_count() > 0)
    }

    /// Process exit status for CI: 0 on pass, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}

/// Result of a full build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub summary: RunSummary,
    pub index: MarketplaceIndex,
    pub output: PathBuf,
}

/// Create the plugins root if it does not exist yet.
pub fn ensure_plugins_root(root: &Path) -> Result<()> {
    if root.is_dir() {
        return Ok(());
    }

    info!(dir = %root.display(), "Plugins directory does not exist, creating it");
    fs::create_dir_all(root).map_err(|e| {
        MarketError::Config(format!(
            "Failed to create plugins directory {}: {}",
            root.display(),
            e
        ))
    })
}

/// Scan every plugin, build the index from the valid ones and write it.
///
/// The artifact is written even when some plugins fail; they are simply left
/// out. Check [`RunSummary::passed`] for the overall verdict.
pub fn run_build(plugins_dir: &Path, output: &Path) -> Result<BuildReport> {
    ensure_plugins_root(plugins_dir)?;

    let outcomes = scan_plugins(plugins_dir, ValidationProfile::default(), &[])?;
    log_outcomes(&outcomes);

    let index = build_index(&outcomes, Utc::now())?;
    write_index(&index, output)?;

    let summary = RunSummary {
        outcomes,
        warnings_block: false,
    };

    info!(
        output = %output.display(),
        valid = summary.valid_count(),
        total = summary.total(),
        "Wrote marketplace index"
    );

    Ok(BuildReport {
        summary,
        index,
        output: output.to_path_buf(),
    })
}

/// Validate plugins without writing anything.
///
/// `strict` enables the review checks and makes warnings blocking. A missing
/// plugins root yields an empty summary. Ids in `only` that have no directory
/// are reported as missing manifests.
pub fn run_validate(plugins_dir: &Path, strict: bool, only: &[String]) -> Result<RunSummary> {
    let profile = ValidationProfile { strict };

    let mut outcomes = if plugins_dir.is_dir() {
        scan_plugins(plugins_dir, profile, only)?
    } else {
        warn!(dir = %plugins_dir.display(), "Plugins directory does not exist");
        Vec::new()
    };

    for id in only {
        if !outcomes.iter().any(|o| &o.id == id) {
            outcomes.push(PluginOutcome {
                id: id.clone(),
                dir: plugins_dir.join(id),
                manifest: None,
                report: ValidationReport::from_error(ValidationError::MissingManifest),
            });
        }
    }

    log_outcomes(&outcomes);

    Ok(RunSummary {
        outcomes,
        warnings_block: strict,
    })
}

fn log_outcomes(outcomes: &[PluginOutcome]) {
    for outcome in outcomes {
        if outcome.is_valid() {
            info!(
                plugin = %outcome.id,
                name = %outcome.display_name(),
                version = outcome.version().unwrap_or("?"),
                warnings = outcome.report.warnings.len(),
                "Plugin is valid"
            );
        } else {
            warn!(
                plugin = %outcome.id,
                errors = outcome.report.errors.len(),
                warnings = outcome.report.warnings.len(),
                "Plugin failed validation"
            );
        }

        for error in &outcome.report.errors {
            warn!(plugin = %outcome.id, code = error.code(), "{}", error);
        }
        for warning in &outcome.report.warnings {
            warn!(plugin = %outcome.id, code = warning.code(), "{}", warning);
        }
    }
}
