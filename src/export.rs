//! Export a health report as plain text or JSON.
//!
//! `vitals report <kind>` snapshots the current records into a
//! [`Report`] and writes it to `--output`, to the configured
//! `report.output_dir` under the report's own file name, or to stdout.

use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

use vitals_core::report::Report;

use crate::config::Config;
use crate::sqlite_store::open_ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Where a rendered report goes.
#[derive(Debug, Clone)]
pub enum ReportTarget {
    Stdout,
    File(PathBuf),
    /// `report.output_dir` joined with the report's file name.
    OutputDir,
}

/// Render `report` in the requested format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(report.render_text()),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Default file path for `report` inside `dir`.
pub fn default_path(dir: &Path, report: &Report, format: ReportFormat) -> PathBuf {
    let path = dir.join(report.file_name());
    match format {
        ReportFormat::Text => path,
        ReportFormat::Json => path.with_extension("json"),
    }
}

pub async fn run_report(
    config: &Config,
    kind: &str,
    format: ReportFormat,
    target: ReportTarget,
) -> Result<()> {
    if kind.trim().is_empty() || kind.contains(['/', '\\']) {
        anyhow::bail!("report kind must be a plain label such as 'weekly'");
    }

    let ledger = open_ledger(config).await?;
    let report = ledger.build_report(kind);
    let rendered = render(&report, format)?;

    let path = match target {
        ReportTarget::Stdout => {
            print!("{}", rendered);
            None
        }
        ReportTarget::File(path) => Some(path),
        ReportTarget::OutputDir => Some(default_path(&config.report.output_dir, &report, format)),
    };

    if let Some(path) = path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        eprintln!(
            "Wrote {} report (score {}/100) to {}",
            report.kind,
            report.score,
            path.display()
        );
    }

    ledger.store().backend().pool().close().await;
    Ok(())
}
