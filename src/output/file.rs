//! Saving search reports to disk

use super::SearchReport;
use crate::core::config::OutputFormat;
use crate::core::error::Result;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `report` into `dir` as `search_<timestamp>.json` or `.md`,
/// creating the directory if needed. Returns the written path.
pub fn save_report(dir: &Path, report: &SearchReport, format: OutputFormat) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let saved_at = Local::now();
    let path = unique_path(dir, &saved_at, format);
    let content = match format {
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
        OutputFormat::Markdown => to_markdown(report, &saved_at),
    };

    fs::write(&path, content)?;
    info!(path = %path.display(), "Saved search results");
    Ok(path)
}

fn extension(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    }
}

/// Timestamped file name; a counter is appended if two saves share a second
fn unique_path(dir: &Path, saved_at: &DateTime<Local>, format: OutputFormat) -> PathBuf {
    let stem = format!("search_{}", saved_at.format("%Y%m%d_%H%M%S"));
    let ext = extension(format);

    let mut path = dir.join(format!("{}.{}", stem, ext));
    let mut n = 1;
    while path.exists() {
        path = dir.join(format!("{}_{}.{}", stem, n, ext));
        n += 1;
    }
    path
}

/// Render a report as a markdown document
pub fn to_markdown(report: &SearchReport, saved_at: &DateTime<Local>) -> String {
    let response = &report.response;
    let mut md = String::new();

    let _ = writeln!(md, "# Search results: {}\n", response.query);
    let _ = writeln!(md, "- **Saved:** {}", saved_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(md, "- **Mode:** {}", response.search_type);
    let _ = writeln!(md, "- **Results:** {}", response.total_results);
    if let Some(ms) = response.processing_time_ms {
        let _ = writeln!(md, "- **Time:** {:.1} ms", ms);
    }
    if let Some(error) = &response.error {
        let _ = writeln!(md, "- **Error:** {}", error);
    }

    if let Some(enhancement) = report.enhancement.as_ref().filter(|e| e.is_rewritten()) {
        let _ = writeln!(md, "\n## Query enhancement\n");
        let _ = writeln!(md, "- **Original:** {}", enhancement.original_query);
        let _ = writeln!(md, "- **Enhanced:** {}", enhancement.enhanced_query);
        if !enhancement.keywords.is_empty() {
            let _ = writeln!(md, "- **Keywords:** {}", enhancement.keywords.join(", "));
        }
        let _ = writeln!(md, "- **Intent:** {}", enhancement.intent);
    }

    if let Some(summary) = &report.summary {
        let _ = writeln!(md, "\n## Summary\n\n{}", summary.summary);
        if !summary.key_points.is_empty() {
            md.push('\n');
            for point in &summary.key_points {
                let _ = writeln!(md, "- {}", point);
            }
        }
        if !summary.relevant_topics.is_empty() {
            let _ = writeln!(md, "\n**Topics:** {}", summary.relevant_topics.join(", "));
        }
    }

    if !response.results.is_empty() {
        let _ = writeln!(md, "\n## Results");
    }
    for (i, result) in response.results.iter().enumerate() {
        let title = result.title.as_deref().unwrap_or(&result.id);
        let _ = writeln!(md, "\n### {}. {}\n", i + 1, title);
        let _ = writeln!(
            md,
            "- **Score:** {:.3}\n- **Source:** {} ({})",
            result.relevance_score, result.source, result.source_type
        );
        if let Some(url) = &result.url {
            let _ = writeln!(md, "- **URL:** {}", url);
        }
        if let Some(updated) = result.updated_at.as_deref().or(result.created_at.as_deref()) {
            let _ = writeln!(md, "- **Updated:** {}", updated);
        }
        let _ = writeln!(md, "\n{}", result.content.trim());
    }

    md
}
