//! JSON output formatting

use super::SearchReport;

/// Format a report as pretty JSON
pub fn format(report: &SearchReport) -> String {
    serde_json::to_string_pretty(report)
        .unwrap_or_else(|e| format!(r#"{{"error": "Failed to serialize results: {}"}}"#, e))
}
