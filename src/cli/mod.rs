//! CLI command definitions and handlers

pub mod collections;
pub mod config;
pub mod search;
pub mod shell;

use crate::core::config::Config;
use crate::core::error::{Error, Result};
use crate::llm::EnhancementPipeline;
use crate::output::SearchReport;
use crate::search::{SearchGateway, SearchMode, SearchQuery, SearchResponse};
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const LONG_ABOUT: &str = r#"
Semantic search over an Airweave collection, with optional AI query
enhancement, re-ranking and summaries.

QUICK START:
    export AIRWEAVE_API_KEY=...          Airweave API key
    export AIRWEAVE_COLLECTION_ID=...    Collection to search
    export GOOGLE_API_KEY=...            Optional: enables AI enhancement
    airsearch                            Start the interactive shell

SEARCH MODES:
    hybrid      Semantic + keyword (default)
    semantic    Vector similarity only
    keyword     Keyword matching only

AI PROVIDERS:
    Set LLM_PROVIDER to google, openai or anthropic and the matching
    GOOGLE_API_KEY, OPENAI_API_KEY or ANTHROPIC_API_KEY. Without a key,
    searches run unenhanced.

EXAMPLES:
    airsearch search "vpn setup"                 One-shot search
    airsearch search -m keyword -n 5 "invoice"   Keyword mode, 5 results
    airsearch search "roadmap" --json            JSON output for scripting
    airsearch collections                        List collections
    airsearch config                             Show effective settings
"#;

/// Semantic search over Airweave collections
#[derive(Parser, Debug)]
#[command(name = "airsearch")]
#[command(author, version)]
#[command(about = "Semantic search over Airweave collections")]
#[command(long_about = LONG_ABOUT)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: config.toml in the airsearch home directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (overridden by AIRSEARCH_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Shell,

    /// Run a single search and print the results
    #[command(visible_alias = "s")]
    Search(SearchArgs),

    /// List the collections visible to the API key
    Collections,

    /// Show the effective configuration and any warnings
    Config,
}

/// Arguments for the search command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:
    airsearch search \"onboarding\"            Enhanced hybrid search
    airsearch search --no-enhance \"okr\"      Plain search, no AI
    airsearch search \"q\" -m semantic -n 3    Semantic mode, 3 results
    airsearch search \"q\" --json --save       JSON output, saved to disk")]
pub struct SearchArgs {
    /// Search query
    pub query: String,

    /// Search mode: hybrid, semantic or keyword
    #[arg(short, long)]
    pub mode: Option<SearchMode>,

    /// Max results
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Skip AI enhancement, re-ranking and summary
    #[arg(long)]
    pub no_enhance: bool,

    /// JSON output
    #[arg(long)]
    pub json: bool,

    /// Save the results to the output directory
    #[arg(long)]
    pub save: bool,
}

/// Load configuration from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// The HTTP client shared by the gateway and the LLM providers
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .build()
        .map_err(Error::from)
}

/// Run one query with the given settings. Search failures are reported in
/// the returned response; only an invalid query is an error.
pub async fn execute_search(
    config: &Config,
    client: &Client,
    text: &str,
    mode: SearchMode,
    limit: usize,
    enhance: bool,
) -> Result<SearchReport> {
    let query = SearchQuery::new(text, mode, limit)?;
    let gateway = SearchGateway::new(client.clone());

    if !enhance {
        let response = gateway.search(&config.airweave, &query).await;
        return Ok(SearchReport::plain(response));
    }

    let pipeline = EnhancementPipeline::from_config(&config.llm, client);
    debug!(model = ?pipeline.model_name(), "Running enhanced search");

    let settings = &config.airweave;
    let gateway = &gateway;
    let outcome = pipeline
        .enhanced_search(query.text(), |enhanced| async move {
            match SearchQuery::new(enhanced, mode, limit) {
                Ok(q) => gateway.search(settings, &q).await,
                Err(e) => SearchResponse::failure(text, mode, e.to_string(), None),
            }
        })
        .await;

    Ok(outcome.into())
}

/// Show the first few characters of a secret
pub fn mask_secret(secret: Option<&str>) -> String {
    match secret.map(str::trim).filter(|s| !s.is_empty()) {
        None => "(not set)".to_string(),
        Some(s) if s.chars().count() <= 8 => "*".repeat(s.chars().count()),
        Some(s) => {
            let head: String = s.chars().take(4).collect();
            format!("{}{}", head, "*".repeat(8))
        }
    }
}
