//! Report generation — JSON and Markdown output
//!
//! Transforms a `CompatibilityReport` into machine-readable or
//! human-readable formats suitable for CI/CD pipelines and review.

pub mod json;
pub mod markdown;

use crate::engine::CompatibilityReport;
use crate::CovalentResult;
use std::path::Path;

/// Output format for the compatibility report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Structured JSON (machine-readable)
    Json,
    /// Human-readable Markdown with tables and summaries
    Markdown,
}

/// Write a report in the specified format
pub fn write_report(
    report: &CompatibilityReport,
    format: ReportFormat,
    output: &Path,
) -> CovalentResult<()> {
    let content = render_report(report, format)?;
    std::fs::write(output, content).map_err(crate::CovalentError::Io)?;
    Ok(())
}

/// Render a report to a string
pub fn render_report(
    report: &CompatibilityReport,
    format: ReportFormat,
) -> CovalentResult<String> {
    match format {
        ReportFormat::Json => json::render(report),
        ReportFormat::Markdown => markdown::render(report),
    }
}
