//! Query enhancement
//!
//! Rewrites a natural-language query into one that retrieves better, and
//! extracts keywords and intent along the way.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::json::parse_object;
use crate::ai::CompletionModel;

/// Intent reported when no model was consulted
pub const DEFAULT_INTENT: &str = "search";

/// Enhanced query result from LLM analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryEnhancement {
    /// The query exactly as the user typed it
    pub original_query: String,

    /// Query to send to Airweave
    pub enhanced_query: String,

    /// Key terms, most important first
    pub keywords: Vec<String>,

    /// Detected intent of the query
    pub intent: String,
}

impl QueryEnhancement {
    /// The no-op enhancement: search for exactly what was typed
    pub fn identity(query: &str) -> Self {
        Self {
            original_query: query.to_string(),
            enhanced_query: query.to_string(),
            keywords: Vec::new(),
            intent: DEFAULT_INTENT.to_string(),
        }
    }

    /// Whether the model actually changed the query
    pub fn is_rewritten(&self) -> bool {
        self.enhanced_query != self.original_query
    }
}

/// Shape the model is asked to reply with
#[derive(Debug, Deserialize)]
struct EnhancementReply {
    #[serde(default)]
    enhanced_query: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    intent: String,
}

fn build_prompt(query: &str) -> String {
    format!(
        r#"You are a search query optimizer for a semantic search engine over a team's documents (Notion pages, wikis, tickets).

Rewrite the user's query so it retrieves the most relevant documents: keep the original meaning, expand abbreviations, and add closely related terms. Also list the key terms and classify the intent.

Respond with JSON only, no markdown formatting:
{{
  "original_query": "the query exactly as given",
  "enhanced_query": "the improved query",
  "keywords": ["term", "term"],
  "intent": "lookup|how_to|troubleshooting|comparison|summary|general"
}}

User query: "{}""#,
        query
    )
}

/// Ask the model to enhance `query`. Errors on transport failures and on
/// replies without a usable JSON object.
pub async fn enhance_query(model: &dyn CompletionModel, query: &str) -> Result<QueryEnhancement> {
    let reply = model.complete(&build_prompt(query)).await?;
    let parsed: EnhancementReply = parse_object(&reply)?;

    let enhanced_query = parsed.enhanced_query.trim();
    if enhanced_query.is_empty() {
        bail!("model reply has an empty enhanced_query");
    }

    let intent = parsed.intent.trim();
    let enhancement = QueryEnhancement {
        original_query: query.to_string(),
        enhanced_query: enhanced_query.to_string(),
        keywords: parsed
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect(),
        intent: if intent.is_empty() {
            DEFAULT_INTENT.to_string()
        } else {
            intent.to_string()
        },
    };

    debug!(
        "Query enhanced: intent={}, enhanced='{}'",
        enhancement.intent, enhancement.enhanced_query
    );

    Ok(enhancement)
}
