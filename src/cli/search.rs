//! Search command implementation

use crate::cli::{execute_search, http_client, SearchArgs};
use crate::core::config::Config;
use crate::core::error::Result;
use crate::output::{file, human, json};
use colored::Colorize;
use tracing::info;

/// Run the search command
pub async fn run(args: SearchArgs, config: Config) -> Result<()> {
    let mode = args.mode.unwrap_or(config.search.default_mode);
    let limit = args.limit.unwrap_or(config.search.limit);
    let enhance = config.search.enhance && !args.no_enhance;

    info!(mode = %mode, limit, enhance, "Running search");

    let client = http_client(&config)?;
    let report = execute_search(&config, &client, &args.query, mode, limit, enhance).await?;

    if args.json {
        println!("{}", json::format(&report));
    } else {
        print!("{}", human::format(&report));
    }

    if args.save || config.output.auto_save {
        let path = file::save_report(&config.output.dir, &report, config.output.format)?;
        // Keep stdout clean for JSON consumers
        eprintln!("{} {}", "Saved to".green(), path.display());
    }

    Ok(())
}
