//! Normalization of Airweave search payloads
//!
//! Airweave does not pin down the shape of its search response: depending on
//! the deployment and the source connector, hits arrive as a bare array or
//! wrapped in one of several envelope fields, and each hit names its fields
//! differently. This module turns whatever arrives into [`CanonicalResult`]s
//! using flat, ordered candidate lists so every precedence rule can be read
//! (and tested) on its own.

use crate::search::results::{CanonicalResult, CollectionSummary};
use serde_json::{Map, Value};

/// How to locate the list of hits inside a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// The body itself is an array
    BareArray,
    /// The body is an object with an array under this field
    Field(&'static str),
}

/// Tried in order; first match wins. No match means zero results.
pub const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule::BareArray,
    ExtractionRule::Field("results"),
    ExtractionRule::Field("data"),
    ExtractionRule::Field("items"),
    ExtractionRule::Field("hits"),
    ExtractionRule::Field("documents"),
];

pub const CONTENT_FIELDS: &[&str] = &[
    "content",
    "text",
    "body",
    "document",
    "page_content",
    "chunk",
    "data",
];
pub const ID_FIELDS: &[&str] = &["id", "_id", "entity_id"];
pub const SOURCE_FIELDS: &[&str] = &["source", "source_name", "collection"];
pub const SOURCE_TYPE_FIELDS: &[&str] = &["source_type", "type"];
pub const SCORE_FIELDS: &[&str] = &["score", "relevance_score", "_score", "similarity"];
pub const TITLE_FIELDS: &[&str] = &["title", "name"];
pub const URL_FIELDS: &[&str] = &["url", "source_url"];
pub const CREATED_AT_FIELDS: &[&str] = &["created_at", "createdAt"];
pub const UPDATED_AT_FIELDS: &[&str] = &["updated_at", "updatedAt"];

pub const DEFAULT_SOURCE: &str = "notion";
pub const DEFAULT_SOURCE_TYPE: &str = "notion";
pub const DEFAULT_SCORE: f64 = 1.0;

impl ExtractionRule {
    fn apply<'a>(&self, body: &'a Value) -> Option<&'a [Value]> {
        match self {
            ExtractionRule::BareArray => body.as_array().map(Vec::as_slice),
            ExtractionRule::Field(name) => body
                .as_object()
                .and_then(|obj| obj.get(*name))
                .and_then(Value::as_array)
                .map(Vec::as_slice),
        }
    }
}

/// Locate the hit list in a response body. Unrecognized shapes (including
/// `null`) yield an empty slice rather than an error.
pub fn extract_records(body: &Value) -> &[Value] {
    EXTRACTION_RULES
        .iter()
        .find_map(|rule| rule.apply(body))
        .unwrap_or_default()
}

/// Normalize every hit in a response body
pub fn normalize_response(body: &Value) -> Vec<CanonicalResult> {
    extract_records(body)
        .iter()
        .enumerate()
        .map(|(position, record)| normalize_record(record, position))
        .collect()
}

/// Map one raw hit to a canonical result. Never fails: a hit with no
/// recognizable fields still yields a result carrying its serialized form.
pub fn normalize_record(record: &Value, position: usize) -> CanonicalResult {
    let fields = record.as_object();

    let content = fields
        .and_then(|f| first_text(f, CONTENT_FIELDS))
        .unwrap_or_else(|| record.to_string());
    let id = fields
        .and_then(|f| first_text(f, ID_FIELDS))
        .unwrap_or_else(|| position.to_string());
    let source = fields
        .and_then(|f| first_text(f, SOURCE_FIELDS))
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let source_type = fields
        .and_then(|f| first_text(f, SOURCE_TYPE_FIELDS))
        .unwrap_or_else(|| DEFAULT_SOURCE_TYPE.to_string());
    let relevance_score = fields
        .and_then(|f| first_number(f, SCORE_FIELDS))
        .unwrap_or(DEFAULT_SCORE);

    CanonicalResult {
        id,
        content,
        source,
        source_type,
        relevance_score,
        metadata: fields
            .and_then(|f| f.get("metadata"))
            .and_then(Value::as_object)
            .cloned(),
        url: fields.and_then(|f| first_text(f, URL_FIELDS)),
        title: fields.and_then(|f| first_text(f, TITLE_FIELDS)),
        created_at: fields.and_then(|f| first_text(f, CREATED_AT_FIELDS)),
        updated_at: fields.and_then(|f| first_text(f, UPDATED_AT_FIELDS)),
    }
}

/// Normalize the collection listing with the same envelope rules
pub fn normalize_collections(body: &Value) -> Vec<CollectionSummary> {
    extract_records(body)
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let fields = record.as_object();
            let id = fields
                .and_then(|f| first_text(f, &["readable_id", "id"]))
                .unwrap_or_else(|| position.to_string());
            let name = fields
                .and_then(|f| first_text(f, &["name", "readable_id", "id"]))
                .unwrap_or_else(|| id.clone());
            CollectionSummary { id, name }
        })
        .collect()
}

/// First candidate key holding a non-empty value, rendered as text
pub fn first_text(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| fields.get(*key).and_then(as_text))
}

/// First candidate key holding a number (or a numeric string)
pub fn first_number(fields: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match fields.get(*key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) if items.is_empty() => None,
        Value::Object(map) if map.is_empty() => None,
        other => Some(other.to_string()),
    }
}
