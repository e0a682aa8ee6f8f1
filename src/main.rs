//! airsearch CLI entry point

use airsearch::cli::{Cli, Commands};
use airsearch::core::error::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; AIRSEARCH_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_env("AIRSEARCH_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = airsearch::cli::load_config(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Shell => airsearch::cli::shell::run(config).await,
        Commands::Search(args) => airsearch::cli::search::run(args, config).await,
        Commands::Collections => airsearch::cli::collections::run(config).await,
        Commands::Config => airsearch::cli::config::run(config),
    }
}
