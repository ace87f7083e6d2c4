//! JSON report renderer

use crate::engine::CompatibilityReport;
use crate::CovalentResult;

/// Render a compatibility report as pretty-printed JSON
pub fn render(report: &CompatibilityReport) -> CovalentResult<String> {
    serde_json::to_string_pretty(report).map_err(crate::CovalentError::SerdeError)
}
