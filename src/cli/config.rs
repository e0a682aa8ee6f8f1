//! Config command: print the effective settings

use crate::cli::mask_secret;
use crate::core::config::{Config, LlmProvider};
use crate::core::error::Result;
use colored::Colorize;

pub fn run(config: Config) -> Result<()> {
    print!("{}", format(&config));
    if let Ok(path) = Config::config_path() {
        println!("\n{} {}", "Config file:".dimmed(), path.display());
    }
    Ok(())
}

/// Effective settings with secrets masked, followed by validation warnings
pub fn format(config: &Config) -> String {
    let mut output = String::new();
    let row = |out: &mut String, key: &str, value: &str| {
        out.push_str(&format!("  {:<18} {}\n", key, value));
    };

    output.push_str(&format!("{}\n", "[airweave]".bold()));
    row(&mut output, "api_key", &mask_secret(config.airweave.api_key()));
    row(
        &mut output,
        "collection_id",
        config.airweave.collection_id().unwrap_or("(not set)"),
    );
    row(&mut output, "base_url", &config.airweave.base_url);

    output.push_str(&format!("{}\n", "[search]".bold()));
    row(&mut output, "default_mode", config.search.default_mode.as_str());
    row(&mut output, "limit", &config.search.limit.to_string());
    row(&mut output, "enhance", &config.search.enhance.to_string());

    let llm = &config.llm;
    output.push_str(&format!("{}\n", "[llm]".bold()));
    row(&mut output, "provider", llm.provider.display_name());
    let model = match llm.provider {
        LlmProvider::Google => &llm.google_model,
        LlmProvider::OpenAi => &llm.openai_model,
        LlmProvider::Anthropic => &llm.anthropic_model,
    };
    row(&mut output, "model", model);
    row(&mut output, "google_api_key", &mask_secret(llm.google_api_key.as_deref()));
    row(&mut output, "openai_api_key", &mask_secret(llm.openai_api_key.as_deref()));
    row(
        &mut output,
        "anthropic_api_key",
        &mask_secret(llm.anthropic_api_key.as_deref()),
    );

    output.push_str(&format!("{}\n", "[output]".bold()));
    row(&mut output, "dir", &config.output.dir.display().to_string());
    row(&mut output, "auto_save", &config.output.auto_save.to_string());
    row(&mut output, "format", &format!("{:?}", config.output.format).to_lowercase());

    output.push_str(&format!("{}\n", "[http]".bold()));
    row(&mut output, "timeout_secs", &config.http.timeout_secs.to_string());

    let warnings = config.validate();
    if !warnings.is_empty() {
        output.push('\n');
        for warning in warnings {
            output.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
        }
    }

    output
}
