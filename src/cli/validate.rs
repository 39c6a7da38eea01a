//! Validate command: check plugins without writing the index.

use anyhow::{Context, Result};
use serde::Serialize;

use plugin_market::pipeline::{run_validate, RunSummary};
use plugin_market::plugins::ValidationReport;
use plugin_market::MarketConfig;

use super::{render_outcome, render_verdict, ReportFormat};

#[derive(Debug, Serialize)]
struct PluginStatus<'a> {
    id: &'a str,
    name: &'a str,
    version: Option<&'a str>,
    valid: bool,
    #[serde(flatten)]
    report: &'a ValidationReport,
}

#[derive(Debug, Serialize)]
struct ValidateOutput<'a> {
    strict: bool,
    passed: bool,
    total: usize,
    valid: usize,
    plugins: Vec<PluginStatus<'a>>,
}

/// Validate `ids` (or every plugin) and print the findings.
/// Returns the process exit status.
pub(crate) fn cmd_validate(
    config: &MarketConfig,
    ids: &[String],
    format: ReportFormat,
) -> Result<u8> {
    let summary = run_validate(&config.plugins_dir, config.strict, ids).with_context(|| {
        format!(
            "Failed to validate plugins in {}",
            config.plugins_dir.display()
        )
    })?;

    match format {
        ReportFormat::Text => print!("{}", render_text(&summary)),
        ReportFormat::Json => println!("{}", render_json(&summary)?),
    }

    Ok(summary.exit_code())
}

fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();

    for outcome in &summary.outcomes {
        out.push_str(&render_outcome(outcome));
    }

    out.push('\n');
    out.push_str(&render_verdict(summary));

    out
}

fn render_json(summary: &RunSummary) -> Result<String> {
    let output = ValidateOutput {
        strict: summary.warnings_block,
        passed: summary.passed(),
        total: summary.total(),
        valid: summary.valid_count(),
        plugins: summary
            .outcomes
            .iter()
            .map(|o| PluginStatus {
                id: &o.id,
                name: o.display_name(),
                version: o.version(),
                valid: o.is_valid(),
                report: &o.report,
            })
            .collect(),
    };

    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn plugin_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("hooked");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("plugin.json"),
            json!({
                "id": "hooked",
                "name": "Hooked",
                "version": "1.0.0",
                "author": "Tester",
                "description": "Registers a hook the panel does not know",
                "hooks": ["on_full_moon"]
            })
            .to_string(),
        )
        .unwrap();
        tmp
    }

    fn summary(root: &Path, strict: bool) -> RunSummary {
        run_validate(root, strict, &[]).unwrap()
    }

    #[test]
    fn test_render_text_footer() {
        let tmp = plugin_tree();

        let lenient = render_text(&summary(tmp.path(), false));
        assert!(lenient.ends_with("1/1 valid, 1 warning(s): PASS\n"));

        let strict = render_text(&summary(tmp.path(), true));
        assert!(strict.contains("(strict): FAIL"));
    }

    #[test]
    fn test_render_json_shape() {
        let tmp = plugin_tree();
        let json: Value = serde_json::from_str(&render_json(&summary(tmp.path(), false)).unwrap())
            .unwrap();

        assert_eq!(json["passed"], true);
        assert_eq!(json["total"], 1);
        let plugin = &json["plugins"][0];
        assert_eq!(plugin["id"], "hooked");
        assert_eq!(plugin["valid"], true);
        assert_eq!(plugin["errors"], json!([]));
        assert_eq!(plugin["warnings"][0]["code"], "UnknownHook");
        assert_eq!(plugin["warnings"][0]["name"], "on_full_moon");
    }
}
