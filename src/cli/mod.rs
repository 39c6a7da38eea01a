//! Command handlers for the `plugin-market` binary.

pub(crate) mod build;
pub(crate) mod validate;

use clap::ValueEnum;

use plugin_market::pipeline::RunSummary;
use plugin_market::plugins::{category_table, PluginOutcome};

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One plugin's status line plus its indented findings.
pub(crate) fn render_outcome(outcome: &PluginOutcome) -> String {
    let mut out = String::new();

    if outcome.is_valid() {
        out.push_str(&format!(
            "  ✓ {} ({} {})\n",
            outcome.id,
            outcome.display_name(),
            outcome.version().unwrap_or("?")
        ));
    } else {
        out.push_str(&format!("  ✗ {}\n", outcome.id));
    }

    for error in &outcome.report.errors {
        out.push_str(&format!("      error   [{}] {}\n", error.code(), error));
    }
    for warning in &outcome.report.warnings {
        out.push_str(&format!("      warning [{}] {}\n", warning.code(), warning));
    }

    out
}

/// Closing line with valid vs. total counts and the overall verdict.
pub(crate) fn render_verdict(summary: &RunSummary) -> String {
    format!(
        "{}/{} valid, {} warning(s){}: {}\n",
        summary.valid_count(),
        summary.total(),
        summary.warning_count(),
        if summary.warnings_block {
            " (strict)"
        } else {
            ""
        },
        if summary.passed() { "PASS" } else { "FAIL" }
    )
}

pub(crate) fn cmd_categories(format: ReportFormat) -> anyhow::Result<()> {
    let table = category_table();

    match format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&table)?),
        ReportFormat::Text => {
            for info in &table {
                println!(
                    "{:<12} {:<12} {}",
                    info.id.as_str(),
                    info.name,
                    info.description
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_market::plugins::{
        RawManifest, ValidationError, ValidationReport, ValidationWarning,
    };
    use serde_json::json;
    use std::path::PathBuf;

    fn outcome(report: ValidationReport) -> PluginOutcome {
        let fields = json!({ "name": "Connection Stats", "version": "1.2.0" });
        PluginOutcome {
            id: "connection-stats".to_string(),
            dir: PathBuf::from("plugins/connection-stats"),
            manifest: Some(RawManifest::new(fields.as_object().unwrap().clone())),
            report,
        }
    }

    #[test]
    fn test_render_valid_outcome() {
        let text = render_outcome(&outcome(ValidationReport::new()));
        assert_eq!(text, "  ✓ connection-stats (Connection Stats 1.2.0)\n");
    }

    #[test]
    fn test_render_invalid_outcome_lists_findings() {
        let mut report = ValidationReport::from_error(ValidationError::EntryPointNotFound {
            path: "main.go".to_string(),
        });
        report.warn(ValidationWarning::UnknownHook {
            name: "on_full_moon".to_string(),
        });

        let text = render_outcome(&outcome(report));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  ✗ connection-stats");
        assert!(lines[1].contains("[EntryPointNotFound]"));
        assert!(lines[1].contains("main.go"));
        assert!(lines[2].contains("[UnknownHook]"));
    }

    #[test]
    fn test_render_verdict() {
        let mut summary = RunSummary {
            outcomes: vec![outcome(ValidationReport::new())],
            warnings_block: false,
        };
        assert_eq!(render_verdict(&summary), "1/1 valid, 0 warning(s): PASS\n");

        summary.outcomes.push(outcome(ValidationReport::from_error(
            ValidationError::MissingManifest,
        )));
        assert_eq!(render_verdict(&summary), "1/2 valid, 0 warning(s): FAIL\n");
    }
}
