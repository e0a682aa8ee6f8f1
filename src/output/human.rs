//! Human-readable output formatting

use super::SearchReport;
use crate::llm::{QueryEnhancement, ResultSummary};
use crate::search::{CanonicalResult, SearchResponse};
use colored::Colorize;

/// Characters of content shown per result
const PREVIEW_CHARS: usize = 300;

/// Format a full report: enhancement, results, then summary
pub fn format(report: &SearchReport) -> String {
    let mut output = String::new();

    if let Some(enhancement) = &report.enhancement {
        let text = format_enhancement(enhancement);
        if !text.is_empty() {
            output.push_str(&text);
            output.push('\n');
        }
    }

    output.push_str(&format_response(&report.response));

    // A failed search has nothing to summarize
    if let Some(summary) = report.summary.as_ref().filter(|_| report.response.success) {
        output.push('\n');
        output.push_str(&format_summary(summary));
    }

    output
}

/// Format a search response for the terminal
pub fn format_response(response: &SearchResponse) -> String {
    let mut output = String::new();
    let timing = response
        .processing_time_ms
        .map(|ms| format!(" ({:.1}ms)", ms))
        .unwrap_or_default();

    if !response.success {
        output.push_str(&format!(
            "{} {}{}\n",
            "Search failed:".red().bold(),
            response.error.as_deref().unwrap_or("unknown error"),
            timing.dimmed()
        ));
        return output;
    }

    if response.results.is_empty() {
        output.push_str(&format!(
            "No results found for '{}' [{}]{}\n",
            response.query,
            response.search_type,
            timing.dimmed()
        ));
        return output;
    }

    output.push_str(&format!(
        "Found {} results for '{}' [{}]{}\n\n",
        response.total_results.to_string().bold(),
        response.query,
        response.search_type,
        timing.dimmed()
    ));

    for (i, result) in response.results.iter().enumerate() {
        output.push_str(&format_result(i + 1, result));
        output.push('\n');
    }

    output
}

fn format_result(rank: usize, result: &CanonicalResult) -> String {
    let mut output = String::new();
    let title = result.title.as_deref().unwrap_or(&result.id);

    output.push_str(&format!(
        "{}. {} {}\n",
        rank,
        title.bright_cyan().bold(),
        format!("({:.3})", result.relevance_score).dimmed()
    ));
    output.push_str(&format!("   {} {}\n", "source:".dimmed(), result.source));
    if let Some(url) = &result.url {
        output.push_str(&format!("   {} {}\n", "url:".dimmed(), url.underline()));
    }

    let preview = preview(&result.content);
    for line in preview.lines() {
        output.push_str(&format!("   {}\n", line));
    }

    output
}

/// Collapse blank lines and cut to the preview length
fn preview(content: &str) -> String {
    let joined: Vec<&str> = content
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    let text = joined.join("\n");

    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        text
    }
}

/// Format a query enhancement; empty when the query was left unchanged
pub fn format_enhancement(enhancement: &QueryEnhancement) -> String {
    if !enhancement.is_rewritten() {
        return String::new();
    }

    let mut output = format!(
        "{} {} {} {}\n",
        "Enhanced:".yellow().bold(),
        enhancement.original_query,
        "→".dimmed(),
        enhancement.enhanced_query.bold()
    );
    if !enhancement.keywords.is_empty() {
        output.push_str(&format!(
            "   {} {}\n",
            "keywords:".dimmed(),
            enhancement.keywords.join(", ")
        ));
    }
    output.push_str(&format!("   {} {}\n", "intent:".dimmed(), enhancement.intent));
    output
}

pub fn format_summary(summary: &ResultSummary) -> String {
    if summary.is_placeholder() {
        return format!("{}\n", summary.summary.dimmed());
    }

    let mut output = format!("{}\n{}\n", "Summary".green().bold(), summary.summary);
    if !summary.key_points.is_empty() {
        output.push('\n');
        for point in &summary.key_points {
            output.push_str(&format!("  • {}\n", point));
        }
    }
    if !summary.relevant_topics.is_empty() {
        output.push_str(&format!(
            "\n{} {}\n",
            "Topics:".dimmed(),
            summary.relevant_topics.join(", ")
        ));
    }
    output
}
