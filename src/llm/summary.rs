//! Result summarization

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::excerpt;
use super::json::parse_object;
use crate::ai::CompletionModel;
use crate::search::CanonicalResult;

/// Only the head of the list is summarized
pub const MAX_SUMMARIZED_RESULTS: usize = 5;

/// Characters of content shown to the model per result
const CONTENT_CHARS: usize = 500;

pub const NO_RESULTS_SUMMARY: &str = "No results to summarize.";
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable: no LLM provider configured.";
pub const SUMMARY_FAILED: &str = "Unable to generate a summary for these results.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub summary: String,
    pub key_points: Vec<String>,
    pub relevant_topics: Vec<String>,
}

impl ResultSummary {
    /// A summary carrying only a fixed message
    pub fn placeholder(message: &str) -> Self {
        Self {
            summary: message.to_string(),
            key_points: Vec::new(),
            relevant_topics: Vec::new(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.key_points.is_empty()
            && self.relevant_topics.is_empty()
            && [NO_RESULTS_SUMMARY, SUMMARY_UNAVAILABLE, SUMMARY_FAILED]
                .contains(&self.summary.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    key_points: Vec<String>,
    #[serde(default)]
    relevant_topics: Vec<String>,
}

fn build_prompt(query: &str, results: &[CanonicalResult]) -> String {
    let mut prompt = format!(
        "Summarize the following search results for the query \"{}\".\n\nResults:\n",
        query
    );
    for (i, result) in results.iter().take(MAX_SUMMARIZED_RESULTS).enumerate() {
        let title = result.title.as_deref().unwrap_or("(untitled)");
        prompt.push_str(&format!(
            "\n{}. {} (source: {})\n{}\n",
            i + 1,
            title,
            result.source,
            excerpt(&result.content, CONTENT_CHARS)
        ));
    }
    prompt.push_str(
        r#"
Respond with JSON only, no markdown formatting:
{
  "summary": "2-3 sentences answering the query from these results",
  "key_points": ["point", "point"],
  "relevant_topics": ["topic", "topic"]
}"#,
    );
    prompt
}

/// Ask the model to summarize the top results. On error the caller
/// substitutes a placeholder.
pub async fn summarize_results(
    model: &dyn CompletionModel,
    results: &[CanonicalResult],
    query: &str,
) -> Result<ResultSummary> {
    let reply = model.complete(&build_prompt(query, results)).await?;
    let parsed: SummaryReply = parse_object(&reply)?;

    if parsed.summary.trim().is_empty() {
        bail!("model reply has an empty summary");
    }

    Ok(ResultSummary {
        summary: parsed.summary.trim().to_string(),
        key_points: parsed.key_points,
        relevant_topics: parsed.relevant_topics,
    })
}
