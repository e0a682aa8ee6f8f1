//! The enhance → search → re-rank → summarize pipeline
//!
//! Every LLM-backed stage is additive: if no model is configured, or a call
//! fails, the stage hands back its input (or a placeholder) and the pipeline
//! carries on. A pipeline without a model still produces the plain search
//! result.

use std::future::Future;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use super::query::{self, QueryEnhancement};
use super::rerank;
use super::summary::{self, ResultSummary, NO_RESULTS_SUMMARY, SUMMARY_FAILED, SUMMARY_UNAVAILABLE};
use crate::ai::{self, CompletionModel};
use crate::core::config::LlmConfig;
use crate::search::{CanonicalResult, SearchResponse};

/// Everything one enhanced query produced
#[derive(Debug, Clone, Serialize)]
pub struct EnhancedSearch {
    pub enhancement: QueryEnhancement,
    pub response: SearchResponse,
    pub summary: ResultSummary,
}

impl EnhancedSearch {
    pub fn results(&self) -> &[CanonicalResult] {
        &self.response.results
    }
}

pub struct EnhancementPipeline {
    model: Option<Box<dyn CompletionModel>>,
}

impl EnhancementPipeline {
    /// Pipeline for the active provider; unconfigured when its key is missing
    pub fn from_config(config: &LlmConfig, client: &Client) -> Self {
        Self {
            model: ai::build_model(config, client),
        }
    }

    pub fn with_model(model: Box<dyn CompletionModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_deref().map(|m| m.name())
    }

    /// Rewrite the query; identity when unconfigured or on any failure
    pub async fn enhance_query(&self, query: &str) -> QueryEnhancement {
        let Some(model) = self.model.as_deref() else {
            return QueryEnhancement::identity(query);
        };

        match query::enhance_query(model, query).await {
            Ok(enhancement) => enhancement,
            Err(e) => {
                warn!("Query enhancement failed, using original: {:#}", e);
                QueryEnhancement::identity(query)
            }
        }
    }

    /// Reorder results by relevance; input order when unconfigured, when
    /// there is nothing to reorder, or on any failure
    pub async fn rerank_results(
        &self,
        results: Vec<CanonicalResult>,
        query: &str,
    ) -> Vec<CanonicalResult> {
        let Some(model) = self.model.as_deref() else {
            return results;
        };
        if results.len() < 2 {
            return results;
        }

        // The model call consumes its input, so keep a copy for the fallback
        match rerank::rerank_results(model, results.clone(), query).await {
            Ok(reranked) => reranked,
            Err(e) => {
                warn!("Reranking failed, keeping original order: {:#}", e);
                results
            }
        }
    }

    /// Summarize the top results; placeholder when there are no results,
    /// when unconfigured, or on any failure
    pub async fn summarize_results(&self, results: &[CanonicalResult], query: &str) -> ResultSummary {
        if results.is_empty() {
            return ResultSummary::placeholder(NO_RESULTS_SUMMARY);
        }
        let Some(model) = self.model.as_deref() else {
            return ResultSummary::placeholder(SUMMARY_UNAVAILABLE);
        };

        match summary::summarize_results(model, results, query).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Summarization failed: {:#}", e);
                ResultSummary::placeholder(SUMMARY_FAILED)
            }
        }
    }

    /// Run the four stages in order. `search_fn` receives the enhanced query.
    pub async fn enhanced_search<F, Fut>(&self, query: &str, search_fn: F) -> EnhancedSearch
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = SearchResponse>,
    {
        let enhancement = self.enhance_query(query).await;
        if enhancement.is_rewritten() {
            info!("Enhanced query: '{}' -> '{}'", query, enhancement.enhanced_query);
        }

        let mut response = search_fn(enhancement.enhanced_query.clone()).await;

        if !response.results.is_empty() {
            let results = std::mem::take(&mut response.results);
            let reranked = self.rerank_results(results, query).await;
            response.set_results(reranked);
        }

        let summary = self.summarize_results(&response.results, query).await;

        EnhancedSearch {
            enhancement,
            response,
            summary,
        }
    }
}
