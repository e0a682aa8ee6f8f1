//! airsearch - Semantic search over Airweave collections
//!
//! Queries go to the Airweave search API through [`search::SearchGateway`],
//! which turns whatever shape the API answers with into
//! [`search::CanonicalResult`]s. An optional LLM pipeline
//! ([`llm::EnhancementPipeline`]) rewrites the query, re-ranks the results
//! and summarizes them, falling back to the plain search on any failure.

pub mod ai;
pub mod cli;
pub mod core;
pub mod llm;
pub mod output;
pub mod search;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
