//! Output formatting

pub mod file;
pub mod human;
pub mod json;

use crate::llm::{EnhancedSearch, QueryEnhancement, ResultSummary};
use crate::search::SearchResponse;
use serde::Serialize;

/// Everything worth keeping about one search, for printing or saving
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub response: SearchResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement: Option<QueryEnhancement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ResultSummary>,
}

impl SearchReport {
    /// Report for a search that ran without the enhancement pipeline
    pub fn plain(response: SearchResponse) -> Self {
        Self {
            response,
            enhancement: None,
            summary: None,
        }
    }
}

impl From<EnhancedSearch> for SearchReport {
    fn from(outcome: EnhancedSearch) -> Self {
        Self {
            response: outcome.response,
            enhancement: Some(outcome.enhancement),
            summary: Some(outcome.summary),
        }
    }
}
