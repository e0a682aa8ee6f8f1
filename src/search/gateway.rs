//! Airweave search gateway
//!
//! One outbound request per query. Every failure is folded into a failed
//! [`SearchResponse`]; nothing raised here escapes to the caller.

use crate::core::config::AirweaveConfig;
use crate::core::error::{Error, Result};
use crate::search::normalize::{normalize_collections, normalize_response};
use crate::search::results::{CollectionSummary, SearchResponse};
use crate::search::SearchQuery;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Response bodies longer than this are cut in trace output
const TRACE_BODY_CHARS: usize = 500;

/// Upstream error bodies longer than this are cut in the error message
const ERROR_BODY_CHARS: usize = 300;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_type: &'a str,
    limit: usize,
}

/// Client for the Airweave collections API
#[derive(Debug, Clone)]
pub struct SearchGateway {
    client: Client,
}

impl SearchGateway {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the configured collection. Settings are read on every call so
    /// operator changes between queries take effect immediately.
    pub async fn search(&self, settings: &AirweaveConfig, query: &SearchQuery) -> SearchResponse {
        let start = Instant::now();
        match self.execute(settings, query).await {
            Ok(body) => {
                let results = normalize_response(&body);
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                info!(
                    query = query.text(),
                    results = results.len(),
                    "Search completed in {:.1}ms",
                    elapsed_ms
                );
                SearchResponse::success(query.text(), query.mode(), results, elapsed_ms)
            }
            Err(e) => {
                warn!(query = query.text(), "Search failed: {}", e);
                let elapsed = match &e {
                    Error::NotConfigured { .. } => None,
                    _ => Some(start.elapsed().as_secs_f64() * 1000.0),
                };
                SearchResponse::failure(query.text(), query.mode(), e.to_string(), elapsed)
            }
        }
    }

    async fn execute(&self, settings: &AirweaveConfig, query: &SearchQuery) -> Result<Value> {
        let api_key = settings.api_key().ok_or(Error::NotConfigured {
            missing: "AIRWEAVE_API_KEY",
        })?;
        let collection_id = settings.collection_id().ok_or(Error::NotConfigured {
            missing: "AIRWEAVE_COLLECTION_ID",
        })?;

        let url = endpoint(&settings.base_url, &["collections", collection_id, "search"])?;
        let request = SearchRequest {
            query: query.text(),
            search_type: query.mode().as_str(),
            limit: query.limit(),
        };

        debug!("POST {} (search_type={}, limit={})", url, request.search_type, request.limit);

        let response = self
            .client
            .post(url)
            .header("x-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        read_json(response).await
    }

    /// List the collections visible to the API key
    pub async fn list_collections(&self, settings: &AirweaveConfig) -> Result<Vec<CollectionSummary>> {
        let api_key = settings.api_key().ok_or(Error::NotConfigured {
            missing: "AIRWEAVE_API_KEY",
        })?;
        let url = endpoint(&settings.base_url, &["collections"])?;

        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("x-api-key", api_key)
            .send()
            .await?;

        let body = read_json(response).await?;
        Ok(normalize_collections(&body))
    }
}

/// Append path segments to the base URL. Each segment is percent-encoded,
/// so a collection id containing `/` or `?` stays a single segment.
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| Error::ConfigError {
        message: format!("AIRWEAVE_BASE_URL '{}' is not a valid URL: {}", base_url, e),
    })?;
    url.path_segments_mut()
        .map_err(|_| Error::ConfigError {
            message: format!("AIRWEAVE_BASE_URL '{}' cannot have a path", base_url),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn upstream_error(status: u16, body: &str) -> Error {
    Error::Upstream {
        status,
        body: truncate(body, ERROR_BODY_CHARS),
    }
}

/// Check status, trace the body and parse it as JSON
async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;

    debug!("Response {} body: {}", status, truncate(&text, TRACE_BODY_CHARS));

    if !status.is_success() {
        return Err(upstream_error(status.as_u16(), &text));
    }

    serde_json::from_str(&text).map_err(|e| Error::MalformedResponse {
        message: format!("response body is not JSON: {}", e),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... ({} bytes total)", &text[..cut], text.len()),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchMode;

    fn query() -> SearchQuery {
        SearchQuery::new("hello", SearchMode::Hybrid, 10).unwrap()
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_io() {
        let settings = AirweaveConfig {
            api_key: None,
            collection_id: Some("docs".to_string()),
            // Unroutable: any attempted request would surface as a transport error
            base_url: "http://127.0.0.1:9".to_string(),
        };
        let response = SearchGateway::new(Client::new()).search(&settings, &query()).await;

        assert!(!response.success);
        assert!(response.results.is_empty());
        assert!(response.processing_time_ms.is_none());
        assert!(response.error.unwrap().contains("AIRWEAVE_API_KEY"));
    }

    #[tokio::test]
    async fn test_blank_collection_fails_without_io() {
        let settings = AirweaveConfig {
            api_key: Some("key".to_string()),
            collection_id: Some("  ".to_string()),
            base_url: "http://127.0.0.1:9".to_string(),
        };
        let response = SearchGateway::new(Client::new()).search(&settings, &query()).await;

        assert!(!response.success);
        assert!(response.error.unwrap().contains("AIRWEAVE_COLLECTION_ID"));
    }

    #[tokio::test]
    async fn test_list_collections_requires_key() {
        let settings = AirweaveConfig::default();
        let err = SearchGateway::new(Client::new())
            .list_collections(&settings)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConfigured { .. }));
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let url = endpoint("https://api.airweave.ai", &["collections", "eng/docs?v=2", "search"]).unwrap();
        assert_eq!(url.as_str(), "https://api.airweave.ai/collections/eng%2Fdocs%3Fv=2/search");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let url = endpoint("http://localhost:8001/api/", &["collections"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8001/api/collections");
    }

    #[test]
    fn test_endpoint_rejects_bad_base_url() {
        let err = endpoint("not a url", &["collections"]).unwrap_err();
        assert!(matches!(err, Error::ConfigError { .. }));
    }

    #[test]
    fn test_upstream_error_body_is_cut() {
        let body = "x".repeat(10_000);
        let message = upstream_error(502, &body).to_string();
        assert!(message.contains("502"));
        assert!(message.contains("(10000 bytes total)"));
        assert!(message.len() < 500, "message was {} bytes", message.len());

        let short = upstream_error(404, "not found").to_string();
        assert_eq!(short, "Airweave API returned 404: not found");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        let cut = truncate("abcdefghij", 4);
        assert!(cut.starts_with("abcd..."));
        assert_eq!(truncate("日本語テキスト", 3), "日本語... (21 bytes total)");
    }
}
