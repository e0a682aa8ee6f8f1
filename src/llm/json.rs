//! Locating JSON inside free-form model replies
//!
//! Models wrap their JSON in prose or markdown fences. The span taken is the
//! greedy one: from the first opening delimiter to the last closing one. When
//! the reply has stray braces around the real payload the span fails to parse
//! and the calling stage falls back.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));

static ARRAY_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\[.*\]").expect("array span pattern is valid"));

/// Outermost `{ ... }` span in `text`
pub fn object_span(text: &str) -> Option<&str> {
    OBJECT_SPAN.find(text).map(|m| m.as_str())
}

/// Outermost `[ ... ]` span in `text`
pub fn array_span(text: &str) -> Option<&str> {
    ARRAY_SPAN.find(text).map(|m| m.as_str())
}

/// Parse the object span of a reply
pub(crate) fn parse_object<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let span = object_span(reply).ok_or_else(|| anyhow!("no JSON object in model reply"))?;
    serde_json::from_str(span).with_context(|| format!("malformed JSON in model reply: {}", span))
}

/// Parse the array span of a reply
pub(crate) fn parse_array<T: DeserializeOwned>(reply: &str) -> Result<T> {
    let span = array_span(reply).ok_or_else(|| anyhow!("no JSON array in model reply"))?;
    serde_json::from_str(span).with_context(|| format!("malformed JSON in model reply: {}", span))
}
