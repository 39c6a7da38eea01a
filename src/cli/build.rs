//! Build command: regenerate the marketplace index.

use anyhow::{Context, Result};

use plugin_market::pipeline::{run_build, BuildReport};
use plugin_market::MarketConfig;

use super::{render_outcome, render_verdict, ReportFormat};

/// Run the build and print a summary. Returns the process exit status.
pub(crate) fn cmd_build(config: &MarketConfig, format: ReportFormat) -> Result<u8> {
    let report = run_build(&config.plugins_dir, &config.output).with_context(|| {
        format!(
            "Failed to build index from {}",
            config.plugins_dir.display()
        )
    })?;

    match format {
        ReportFormat::Text => print!("{}", render_build(&report)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report.index)?),
    }

    Ok(report.summary.exit_code())
}

fn render_build(report: &BuildReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str(&format!("Scanned {} plugin(s)\n", summary.total()));
    for outcome in &summary.outcomes {
        out.push_str(&render_outcome(outcome));
    }

    out.push('\n');
    out.push_str(&format!(
        "Indexed {} plugin(s), {} excluded -> {}\n",
        report.index.plugin_count,
        summary.invalid_count(),
        report.output.display()
    ));
    out.push_str(&render_verdict(summary));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_build_summary() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("plugins");
        let dir = root.join("ban-sync");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("plugin.json"),
            json!({
                "id": "ban-sync",
                "name": "Ban Sync",
                "version": "0.3.0",
                "author": "Tester",
                "description": "Synchronises bans across linked servers"
            })
            .to_string(),
        )
        .unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();

        let report = run_build(&root, &tmp.path().join("plugins.json")).unwrap();
        let text = render_build(&report);

        assert!(text.starts_with("Scanned 2 plugin(s)"));
        assert!(text.contains("✓ ban-sync (Ban Sync 0.3.0)"));
        assert!(text.contains("✗ empty"));
        assert!(text.contains("Indexed 1 plugin(s), 1 excluded"));
        assert!(text.ends_with("1/2 valid, 0 warning(s): FAIL\n"));
        assert_eq!(report.summary.exit_code(), 1);
    }
}
