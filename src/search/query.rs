//! Search queries sent to Airweave

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retrieval strategy requested from Airweave
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    #[default]
    Hybrid,
    Semantic,
    Keyword,
}

impl SearchMode {
    /// Wire name used in the `search_type` request field
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Hybrid => "hybrid",
            SearchMode::Semantic => "semantic",
            SearchMode::Keyword => "keyword",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(SearchMode::Hybrid),
            "semantic" => Ok(SearchMode::Semantic),
            "keyword" => Ok(SearchMode::Keyword),
            other => Err(Error::InvalidQuery {
                message: format!(
                    "Unknown search mode '{}' (expected hybrid, semantic or keyword)",
                    other
                ),
            }),
        }
    }
}

/// A validated search query. Built fresh for every user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    mode: SearchMode,
    limit: usize,
}

impl SearchQuery {
    /// Create a new search query; rejects blank text and a zero limit
    pub fn new(text: impl Into<String>, mode: SearchMode, limit: usize) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::InvalidQuery {
                message: "query text is empty".to_string(),
            });
        }
        if limit == 0 {
            return Err(Error::InvalidQuery {
                message: "limit must be at least 1".to_string(),
            });
        }
        Ok(Self { text, mode, limit })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_query() {
        let query = SearchQuery::new("quarterly roadmap", SearchMode::Semantic, 5).unwrap();
        assert_eq!(query.text(), "quarterly roadmap");
        assert_eq!(query.mode(), SearchMode::Semantic);
        assert_eq!(query.limit(), 5);
    }

    #[test]
    fn test_rejects_blank_text() {
        assert!(SearchQuery::new("   ", SearchMode::Hybrid, 10).is_err());
        assert!(SearchQuery::new("", SearchMode::Hybrid, 10).is_err());
    }

    #[test]
    fn test_rejects_zero_limit() {
        let err = SearchQuery::new("x", SearchMode::Hybrid, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidQuery { .. }));
    }

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!("HYBRID".parse::<SearchMode>().unwrap(), SearchMode::Hybrid);
        assert_eq!(" keyword ".parse::<SearchMode>().unwrap(), SearchMode::Keyword);
        assert!("vector".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        let json = serde_json::to_string(&SearchMode::Semantic).unwrap();
        assert_eq!(json, "\"semantic\"");
    }
}
