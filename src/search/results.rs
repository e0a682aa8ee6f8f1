use crate::search::SearchMode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A search hit in a stable shape, whatever the upstream record looked like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub id: String,
    pub content: String,
    pub source: String,
    pub source_type: String,
    pub relevance_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Outcome of one search call. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub search_type: SearchMode,
    pub results: Vec<CanonicalResult>,
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResponse {
    pub fn success(
        query: impl Into<String>,
        search_type: SearchMode,
        results: Vec<CanonicalResult>,
        processing_time_ms: f64,
    ) -> Self {
        let total_results = results.len();
        Self {
            success: true,
            query: query.into(),
            search_type,
            results,
            total_results,
            processing_time_ms: Some(processing_time_ms),
            error: None,
        }
    }

    pub fn failure(
        query: impl Into<String>,
        search_type: SearchMode,
        error: impl Into<String>,
        processing_time_ms: Option<f64>,
    ) -> Self {
        Self {
            success: false,
            query: query.into(),
            search_type,
            results: Vec::new(),
            total_results: 0,
            processing_time_ms,
            error: Some(error.into()),
        }
    }

    /// Swap in a reordered result list, keeping `total_results` in step
    pub fn set_results(&mut self, results: Vec<CanonicalResult>) {
        self.total_results = results.len();
        self.results = results;
    }
}

/// One entry of the collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub id: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str) -> CanonicalResult {
        CanonicalResult {
            id: id.to_string(),
            content: "text".to_string(),
            source: "notion".to_string(),
            source_type: "notion".to_string(),
            relevance_score: 1.0,
            metadata: None,
            url: None,
            title: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_failure_has_no_results() {
        let response = SearchResponse::failure("q", SearchMode::Hybrid, "boom", None);
        assert!(!response.success);
        assert!(response.results.is_empty());
        assert_eq!(response.total_results, 0);
        assert_eq!(response.error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_set_results_updates_total() {
        let mut response = SearchResponse::success("q", SearchMode::Keyword, vec![result("a")], 1.0);
        response.set_results(vec![result("b"), result("a")]);
        assert_eq!(response.total_results, 2);
        assert_eq!(response.results[0].id, "b");
    }

    #[test]
    fn test_optional_fields_are_skipped() {
        let json = serde_json::to_value(result("a")).unwrap();
        assert!(json.get("url").is_none());
        assert!(json.get("metadata").is_none());
        assert_eq!(json["relevance_score"], 1.0);
    }
}
