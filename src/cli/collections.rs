//! Collections command implementation

use crate::cli::http_client;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::search::{CollectionSummary, SearchGateway};
use colored::Colorize;

/// Run the collections command
pub async fn run(config: Config) -> Result<()> {
    let gateway = SearchGateway::new(http_client(&config)?);
    let collections = gateway.list_collections(&config.airweave).await?;
    print!("{}", format(&collections, config.airweave.collection_id()));
    Ok(())
}

/// Table of collections, marking the active one
pub fn format(collections: &[CollectionSummary], active: Option<&str>) -> String {
    if collections.is_empty() {
        return "No collections found.\n".to_string();
    }

    let width = collections.iter().map(|c| c.id.len()).max().unwrap_or(0);
    let mut output = format!("{} collections\n\n", collections.len().to_string().bold());

    for collection in collections {
        let marker = if Some(collection.id.as_str()) == active {
            " ✓".green().to_string()
        } else {
            String::new()
        };
        let id = format!("{:<width$}", collection.id, width = width);
        output.push_str(&format!("  {}  {}{}\n", id.bright_cyan(), collection.name, marker));
    }

    output
}
