//! LLM-powered search enhancement
//!
//! Three optional stages wrap a plain Airweave search: query rewriting,
//! result re-ranking and result summarization. Each stage is independent and
//! falls back to its input (or a placeholder) whenever the model is missing,
//! unreachable, or answers with something unparseable.

mod json;
pub mod pipeline;
mod query;
mod rerank;
mod summary;

pub use json::{array_span, object_span};
pub use pipeline::{EnhancedSearch, EnhancementPipeline};
pub use query::{enhance_query, QueryEnhancement};
pub use rerank::{complete_permutation, parse_ranking, rerank_results};
pub use summary::{
    summarize_results, ResultSummary, NO_RESULTS_SUMMARY, SUMMARY_FAILED, SUMMARY_UNAVAILABLE,
};

/// Cut text to at most `max_chars` characters, marking the cut
pub(crate) fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
