//! Interactive search shell
//!
//! Lines starting with `/` are commands; anything else is a query. Settings
//! changed with commands live in the session's [`Config`] and apply from the
//! next query on. Each query runs to completion before the next prompt.

use crate::cli::{collections, execute_search, http_client};
use crate::core::config::{Config, LlmProvider};
use crate::core::error::{Error, Result};
use crate::output::{file, human, SearchReport};
use crate::search::{SearchGateway, SearchMode};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::Client;
use std::io;
use tracing::debug;

const HELP: &str = "Commands:
  /help                         Show this help
  /status                       Show the current session settings
  /mode <hybrid|semantic|keyword>
                                Set the search mode
  /limit <n>                    Set the maximum number of results
  /collection <id>              Search a different collection
  /provider <google|openai|anthropic>
                                Switch the LLM provider
  /enhance [on|off]             Toggle AI enhancement
  /collections                  List available collections
  /save                         Save the last results to disk
  /persist                      Write the session settings to config.toml
  /quit, /exit                  Leave the shell

Anything else is searched.";

/// A parsed shell command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Mode(SearchMode),
    Limit(usize),
    Collection(String),
    Provider(LlmProvider),
    /// `None` toggles
    Enhance(Option<bool>),
    Collections,
    Save,
    /// Write the session settings to the config file
    Persist,
    Quit,
}

impl ShellCommand {
    /// Parse a `/command [arg]` line. The error is a message for the user.
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let line = line.trim();
        let body = line.strip_prefix('/').unwrap_or(line);
        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (body, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "help" | "h" | "?" => Ok(ShellCommand::Help),
            "status" => Ok(ShellCommand::Status),
            "mode" => required(arg, "/mode <hybrid|semantic|keyword>")?
                .parse()
                .map(ShellCommand::Mode)
                .map_err(|e: Error| e.to_string()),
            "limit" => {
                let value = required(arg, "/limit <n>")?;
                match value.parse::<usize>() {
                    Ok(n) if n > 0 => Ok(ShellCommand::Limit(n)),
                    _ => Err(format!("Invalid limit '{}': expected a positive integer", value)),
                }
            }
            "collection" => {
                required(arg, "/collection <id>").map(|id| ShellCommand::Collection(id.to_string()))
            }
            "provider" => required(arg, "/provider <google|openai|anthropic>")?
                .parse()
                .map(ShellCommand::Provider)
                .map_err(|e: Error| e.to_string()),
            "enhance" => match arg.to_ascii_lowercase().as_str() {
                "" => Ok(ShellCommand::Enhance(None)),
                "on" | "true" | "yes" => Ok(ShellCommand::Enhance(Some(true))),
                "off" | "false" | "no" => Ok(ShellCommand::Enhance(Some(false))),
                other => Err(format!("Invalid value '{}': use /enhance on or /enhance off", other)),
            },
            "collections" => Ok(ShellCommand::Collections),
            "save" => Ok(ShellCommand::Save),
            "persist" => Ok(ShellCommand::Persist),
            "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
            other => Err(format!("Unknown command '/{}'. Type /help for a list.", other)),
        }
    }
}

fn required<'a>(arg: &'a str, usage: &str) -> std::result::Result<&'a str, String> {
    if arg.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(arg)
    }
}

/// State of one interactive session
pub struct Shell {
    config: Config,
    client: Client,
    last_report: Option<SearchReport>,
}

impl Shell {
    pub fn new(config: Config) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self {
            config,
            client,
            last_report: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply a settings command. Returns the message to show, or `None`
    /// for commands that need I/O and are handled by the loop.
    pub fn apply(&mut self, command: &ShellCommand) -> Option<String> {
        match command {
            ShellCommand::Help => Some(HELP.to_string()),
            ShellCommand::Status => Some(self.status()),
            ShellCommand::Mode(mode) => {
                self.config.search.default_mode = *mode;
                Some(format!("Search mode set to {}", mode))
            }
            ShellCommand::Limit(limit) => {
                self.config.search.limit = *limit;
                Some(format!("Result limit set to {}", limit))
            }
            ShellCommand::Collection(id) => {
                self.config.airweave.collection_id = Some(id.clone());
                Some(format!("Searching collection {}", id))
            }
            ShellCommand::Provider(provider) => {
                self.config.llm.provider = *provider;
                let mut message = format!("LLM provider set to {}", provider.display_name());
                if !self.config.llm.is_configured() {
                    message.push_str(&format!(
                        " ({} is not set; enhancement will be skipped)",
                        provider.key_env()
                    ));
                }
                Some(message)
            }
            ShellCommand::Enhance(value) => {
                let enabled = value.unwrap_or(!self.config.search.enhance);
                self.config.search.enhance = enabled;
                Some(format!(
                    "AI enhancement {}",
                    if enabled { "enabled" } else { "disabled" }
                ))
            }
            ShellCommand::Collections
            | ShellCommand::Save
            | ShellCommand::Persist
            | ShellCommand::Quit => None,
        }
    }

    fn status(&self) -> String {
        let config = &self.config;
        let llm = if config.llm.is_configured() {
            format!("{} ✓", config.llm.provider.display_name())
        } else {
            format!("{} (no {})", config.llm.provider.display_name(), config.llm.provider.key_env())
        };

        format!(
            "  collection  {}\n  mode        {}\n  limit       {}\n  enhance     {}\n  provider    {}\n  output      {}",
            config.airweave.collection_id().unwrap_or("(not set)"),
            config.search.default_mode,
            config.search.limit,
            if config.search.enhance { "on" } else { "off" },
            llm,
            config.output.dir.display()
        )
    }

    /// Run one query with the session settings and print the results
    pub async fn search(&mut self, text: &str) -> Result<()> {
        let config = &self.config;
        let report = execute_search(
            config,
            &self.client,
            text,
            config.search.default_mode,
            config.search.limit,
            config.search.enhance,
        )
        .await?;

        println!();
        print!("{}", human::format(&report));

        // Stored before auto-save, which may fail
        let report = self.last_report.insert(report);

        let output = &self.config.output;
        if output.auto_save {
            let path = file::save_report(&output.dir, report, output.format)?;
            println!("{} {}", "Saved to".green(), path.display());
        }

        Ok(())
    }

    async fn list_collections(&self) -> Result<()> {
        let gateway = SearchGateway::new(self.client.clone());
        let list = gateway.list_collections(&self.config.airweave).await?;
        print!("{}", collections::format(&list, self.config.airweave.collection_id()));
        Ok(())
    }

    fn save_last(&self) -> Result<String> {
        match &self.last_report {
            Some(report) => {
                let path = file::save_report(&self.config.output.dir, report, self.config.output.format)?;
                Ok(format!("Saved to {}", path.display()))
            }
            None => Ok("Nothing to save yet: run a search first".to_string()),
        }
    }

    /// Handle one input line. Returns false when the session should end.
    pub async fn handle_line(&mut self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() {
            return true;
        }

        if !line.starts_with('/') {
            if let Err(e) = self.search(line).await {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
            return true;
        }

        let command = match ShellCommand::parse(line) {
            Ok(command) => command,
            Err(message) => {
                eprintln!("{}", message.yellow());
                return true;
            }
        };
        debug!(?command, "Shell command");

        let outcome = match &command {
            ShellCommand::Quit => return false,
            ShellCommand::Collections => self.list_collections().await.map(|_| None),
            ShellCommand::Save => self.save_last().map(Some),
            ShellCommand::Persist => self
                .config
                .save()
                .map(|path| Some(format!("Settings saved to {}", path.display()))),
            other => Ok(self.apply(other)),
        };

        match outcome {
            Ok(Some(message)) => println!("{}", message),
            Ok(None) => {}
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        true
    }
}

fn print_banner(config: &Config) {
    println!("{}", "airsearch".bright_cyan().bold());
    println!(
        "{}",
        "Search your Airweave collection. Type /help for commands, /quit to leave.".dimmed()
    );
    for warning in config.validate() {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }
    println!();
}

/// Closed stdin (Ctrl-D, or a pipe that ran dry) ends the session
fn is_end_of_input(err: &dialoguer::Error) -> bool {
    matches!(
        err,
        dialoguer::Error::IO(e) if e.kind() == io::ErrorKind::UnexpectedEof
    )
}

/// Run the interactive shell until the user quits
pub async fn run(config: Config) -> Result<()> {
    print_banner(&config);
    let mut shell = Shell::new(config)?;
    let theme = ColorfulTheme::default();

    loop {
        let line: String = match Input::with_theme(&theme)
            .with_prompt("airsearch")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(e) if is_end_of_input(&e) => {
                println!();
                break;
            }
            Err(e) => {
                return Err(Error::Prompt {
                    message: format!("Failed to read input: {}", e),
                })
            }
        };

        if !shell.handle_line(&line).await {
            break;
        }
    }

    println!("Bye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(ShellCommand::parse("/help"), Ok(ShellCommand::Help));
        assert_eq!(ShellCommand::parse("  /STATUS "), Ok(ShellCommand::Status));
        assert_eq!(ShellCommand::parse("/collections"), Ok(ShellCommand::Collections));
        assert_eq!(ShellCommand::parse("/save"), Ok(ShellCommand::Save));
        assert_eq!(ShellCommand::parse("/persist"), Ok(ShellCommand::Persist));
        assert_eq!(ShellCommand::parse("/quit"), Ok(ShellCommand::Quit));
        assert_eq!(ShellCommand::parse("/exit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            ShellCommand::parse("/mode Semantic"),
            Ok(ShellCommand::Mode(SearchMode::Semantic))
        );
        assert!(ShellCommand::parse("/mode").unwrap_err().starts_with("Usage:"));
        assert!(ShellCommand::parse("/mode fuzzy").unwrap_err().contains("fuzzy"));
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(ShellCommand::parse("/limit 25"), Ok(ShellCommand::Limit(25)));
        assert!(ShellCommand::parse("/limit 0").is_err());
        assert!(ShellCommand::parse("/limit many").is_err());
    }

    #[test]
    fn test_parse_collection_and_provider() {
        assert_eq!(
            ShellCommand::parse("/collection  eng-docs "),
            Ok(ShellCommand::Collection("eng-docs".to_string()))
        );
        assert_eq!(
            ShellCommand::parse("/provider claude"),
            Ok(ShellCommand::Provider(LlmProvider::Anthropic))
        );
        assert!(ShellCommand::parse("/provider mistral").is_err());
    }

    #[test]
    fn test_parse_enhance() {
        assert_eq!(ShellCommand::parse("/enhance"), Ok(ShellCommand::Enhance(None)));
        assert_eq!(ShellCommand::parse("/enhance on"), Ok(ShellCommand::Enhance(Some(true))));
        assert_eq!(ShellCommand::parse("/enhance OFF"), Ok(ShellCommand::Enhance(Some(false))));
        assert!(ShellCommand::parse("/enhance maybe").is_err());
    }

    #[test]
    fn test_parse_unknown() {
        let err = ShellCommand::parse("/frobnicate").unwrap_err();
        assert!(err.contains("/frobnicate"));
        assert!(err.contains("/help"));
    }

    #[test]
    fn test_settings_apply_to_session_config() {
        let mut shell = Shell::new(Config::default()).unwrap();

        shell.apply(&ShellCommand::Mode(SearchMode::Keyword));
        shell.apply(&ShellCommand::Limit(3));
        shell.apply(&ShellCommand::Collection("hr".to_string()));
        shell.apply(&ShellCommand::Provider(LlmProvider::OpenAi));

        let config = shell.config();
        assert_eq!(config.search.default_mode, SearchMode::Keyword);
        assert_eq!(config.search.limit, 3);
        assert_eq!(config.airweave.collection_id(), Some("hr"));
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
    }

    #[test]
    fn test_enhance_toggle() {
        let mut shell = Shell::new(Config::default()).unwrap();
        assert!(shell.config().search.enhance);

        shell.apply(&ShellCommand::Enhance(None));
        assert!(!shell.config().search.enhance);
        shell.apply(&ShellCommand::Enhance(None));
        assert!(shell.config().search.enhance);
        shell.apply(&ShellCommand::Enhance(Some(false)));
        assert!(!shell.config().search.enhance);
    }

    #[test]
    fn test_provider_switch_warns_about_missing_key() {
        let mut shell = Shell::new(Config::default()).unwrap();
        let message = shell.apply(&ShellCommand::Provider(LlmProvider::Anthropic)).unwrap();
        assert!(message.contains("ANTHROPIC_API_KEY"));
    }

    #[tokio::test]
    async fn test_quit_ends_session() {
        let mut shell = Shell::new(Config::default()).unwrap();
        assert!(shell.handle_line("   ").await);
        assert!(shell.handle_line("/mode keyword").await);
        assert!(shell.handle_line("/bogus").await);
        assert!(!shell.handle_line("/quit").await);
    }

    #[test]
    fn test_save_without_results() {
        let shell = Shell::new(Config::default()).unwrap();
        assert!(shell.save_last().unwrap().starts_with("Nothing to save"));
    }

    #[tokio::test]
    async fn test_failed_auto_save_keeps_latest_report() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.search.enhance = false;
        config.output.auto_save = true;
        config.output.dir = tmp.path().join("results");
        let mut shell = Shell::new(config).unwrap();

        shell.search("first query").await.unwrap();
        assert_eq!(shell.last_report.as_ref().unwrap().response.query, "first query");

        // A directory can't be created under a regular file
        let blocker = tmp.path().join("file.txt");
        std::fs::write(&blocker, "not a directory").unwrap();
        shell.config.output.dir = blocker.join("sub");

        assert!(shell.search("second query").await.is_err());
        assert_eq!(shell.last_report.as_ref().unwrap().response.query, "second query");
    }

    #[test]
    fn test_end_of_input_detection() {
        let eof = dialoguer::Error::IO(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(is_end_of_input(&eof));

        let other = dialoguer::Error::IO(io::Error::new(io::ErrorKind::Other, "terminal gone"));
        assert!(!is_end_of_input(&other));
    }
}
