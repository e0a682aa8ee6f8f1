//! Configuration management
//!
//! Values come from three layers, later ones winning: built-in defaults,
//! `config.toml` in the airsearch home directory, then environment variables.
//! Missing credentials never fail loading; the components that need them fall
//! back to their unconfigured behavior instead.

use crate::core::error::{Error, Result};
use crate::search::SearchMode;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.airweave.ai";
pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Global configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub airweave: AirweaveConfig,
    pub search: SearchConfig,
    pub llm: LlmConfig,
    pub output: OutputConfig,
    pub http: HttpConfig,
}

/// Connection settings for the Airweave API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AirweaveConfig {
    pub api_key: Option<String>,
    /// Readable id of the collection to search
    pub collection_id: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub default_mode: SearchMode,
    /// Maximum results requested per query
    pub limit: usize,
    /// Run the LLM enhancement pipeline around each query
    pub enhance: bool,
}

/// LLM provider selection and per-provider credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub google_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_model: String,
    pub openai_model: String,
    pub anthropic_model: String,
    pub google_base_url: String,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory result files are written to
    pub dir: PathBuf,
    /// Save every search without being asked
    pub auto_save: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout for every outbound call
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Google,
    OpenAi,
    Anthropic,
}

/// File format for saved results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

impl Default for AirweaveConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            collection_id: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_mode: SearchMode::Hybrid,
            limit: DEFAULT_LIMIT,
            enhance: true,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::Google,
            google_api_key: None,
            openai_api_key: None,
            anthropic_api_key: None,
            google_model: "gemini-1.5-flash".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            anthropic_model: "claude-3-5-haiku-latest".to_string(),
            google_base_url: "https://generativelanguage.googleapis.com".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            anthropic_base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("search_results"),
            auto_save: false,
            format: OutputFormat::Json,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmProvider {
    /// Environment variable holding this provider's key
    pub fn key_env(&self) -> &'static str {
        match self {
            LlmProvider::Google => "GOOGLE_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY",
            LlmProvider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            LlmProvider::Google => "Gemini (Google)",
            LlmProvider::OpenAi => "OpenAI",
            LlmProvider::Anthropic => "Claude (Anthropic)",
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LlmProvider::Google => "google",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Anthropic => "anthropic",
        };
        f.write_str(name)
    }
}

impl FromStr for LlmProvider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" | "gemini" => Ok(LlmProvider::Google),
            "openai" => Ok(LlmProvider::OpenAi),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(Error::ConfigError {
                message: format!(
                    "Unknown LLM provider '{}' (expected google, openai or anthropic)",
                    other
                ),
            }),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(Error::ConfigError {
                message: format!("Unknown output format '{}'", other),
            }),
        }
    }
}

impl LlmConfig {
    /// Key for the currently selected provider, if set and non-blank
    pub fn active_key(&self) -> Option<&str> {
        let key = match self.provider {
            LlmProvider::Google => self.google_api_key.as_deref(),
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
            LlmProvider::Anthropic => self.anthropic_api_key.as_deref(),
        };
        non_blank(key)
    }

    pub fn is_configured(&self) -> bool {
        self.active_key().is_some()
    }
}

impl AirweaveConfig {
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    pub fn collection_id(&self) -> Option<&str> {
        non_blank(self.collection_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl Config {
    /// Load configuration from the default location, then apply env overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit file, then apply env overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let mut config = Self::from_file(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply environment overrides. `lookup` abstracts the environment so
    /// tests don't have to mutate process state.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("AIRWEAVE_API_KEY") {
            self.airweave.api_key = Some(key);
        }
        if let Some(id) = lookup("AIRWEAVE_COLLECTION_ID") {
            self.airweave.collection_id = Some(id);
        }
        if let Some(url) = lookup("AIRWEAVE_BASE_URL") {
            self.airweave.base_url = url;
        }
        if let Some(provider) = lookup("LLM_PROVIDER") {
            match provider.parse() {
                Ok(p) => self.llm.provider = p,
                Err(e) => warn!("Ignoring LLM_PROVIDER: {}", e),
            }
        }
        if let Some(key) = lookup("GOOGLE_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.llm.google_api_key = Some(key);
        }
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(key) = lookup("ANTHROPIC_API_KEY") {
            self.llm.anthropic_api_key = Some(key);
        }
        if let Some(mode) = lookup("DEFAULT_SEARCH_MODE") {
            match mode.parse() {
                Ok(m) => self.search.default_mode = m,
                Err(e) => warn!("Ignoring DEFAULT_SEARCH_MODE: {}", e),
            }
        }
        if let Some(limit) = lookup("SEARCH_LIMIT") {
            match limit.trim().parse::<usize>() {
                Ok(n) if n > 0 => self.search.limit = n,
                _ => warn!("Ignoring SEARCH_LIMIT '{}': expected a positive integer", limit),
            }
        }
        if let Some(dir) = lookup("AIRSEARCH_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
    }

    /// Human-readable warnings about missing settings
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.airweave.api_key().is_none() {
            warnings.push("AIRWEAVE_API_KEY is not set; searches will fail".to_string());
        }
        if self.airweave.collection_id().is_none() {
            warnings.push(
                "AIRWEAVE_COLLECTION_ID is not set; use /collection <id> to pick one".to_string(),
            );
        }
        if url::Url::parse(&self.airweave.base_url).is_err() {
            warnings.push(format!(
                "AIRWEAVE_BASE_URL '{}' is not a valid URL",
                self.airweave.base_url
            ));
        }
        if !self.llm.is_configured() {
            warnings.push(format!(
                "{} is not set; AI enhancement is disabled",
                self.llm.provider.key_env()
            ));
        }

        warnings
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf> {
        Self::ensure_home()?;
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Write settings to `path`. API keys are taken from the file already at
    /// `path` (if any), never from `self`, so keys that came from the
    /// environment are not written to disk.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let on_disk = if path.exists() {
            Self::from_file(path)?
        } else {
            Config::default()
        };

        let mut config = self.clone();
        config.airweave.api_key = on_disk.airweave.api_key;
        config.llm.google_api_key = on_disk.llm.google_api_key;
        config.llm.openai_api_key = on_disk.llm.openai_api_key;
        config.llm.anthropic_api_key = on_disk.llm.anthropic_api_key;

        std::fs::write(path, toml::to_string_pretty(&config)?)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::airsearch_home()?.join("config.toml"))
    }

    /// Get the airsearch home directory
    pub fn airsearch_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("AIRSEARCH_HOME") {
            return Ok(PathBuf::from(home));
        }

        ProjectDirs::from("dev", "airsearch", "airsearch")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| Error::ConfigError {
                message: "Could not determine airsearch home directory".to_string(),
            })
    }

    /// Ensure home directory exists
    pub fn ensure_home() -> Result<()> {
        let home = Self::airsearch_home()?;
        if !home.exists() {
            std::fs::create_dir_all(&home)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.airweave.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.search.default_mode, SearchMode::Hybrid);
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
        assert_eq!(config.llm.provider, LlmProvider::Google);
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("AIRWEAVE_API_KEY", "key-1"),
            ("AIRWEAVE_COLLECTION_ID", "notion-abc"),
            ("LLM_PROVIDER", "claude"),
            ("ANTHROPIC_API_KEY", "sk-ant"),
            ("DEFAULT_SEARCH_MODE", "semantic"),
            ("SEARCH_LIMIT", "25"),
        ]));

        assert_eq!(config.airweave.api_key(), Some("key-1"));
        assert_eq!(config.airweave.collection_id(), Some("notion-abc"));
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.active_key(), Some("sk-ant"));
        assert_eq!(config.search.default_mode, SearchMode::Semantic);
        assert_eq!(config.search.limit, 25);
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[
            ("LLM_PROVIDER", "mistral"),
            ("DEFAULT_SEARCH_MODE", "fuzzy"),
            ("SEARCH_LIMIT", "0"),
        ]));

        assert_eq!(config.llm.provider, LlmProvider::Google);
        assert_eq!(config.search.default_mode, SearchMode::Hybrid);
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_gemini_key_alias() {
        let mut config = Config::default();
        config.apply_env(env(&[("GEMINI_API_KEY", "g-key")]));
        assert_eq!(config.llm.active_key(), Some("g-key"));
    }

    #[test]
    fn test_blank_keys_count_as_missing() {
        let mut config = Config::default();
        config.airweave.api_key = Some("   ".to_string());
        config.llm.google_api_key = Some(String::new());
        assert!(config.airweave.api_key().is_none());
        assert!(!config.llm.is_configured());
    }

    #[test]
    fn test_validate_reports_missing_values() {
        let warnings = Config::default().validate();
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("AIRWEAVE_API_KEY"));
        assert!(warnings[1].contains("AIRWEAVE_COLLECTION_ID"));
        assert!(warnings[2].contains("GOOGLE_API_KEY"));
    }

    #[test]
    fn test_validate_clean_config() {
        let mut config = Config::default();
        config.airweave.api_key = Some("k".to_string());
        config.airweave.collection_id = Some("c".to_string());
        config.llm.provider = LlmProvider::OpenAi;
        config.llm.openai_api_key = Some("sk".to_string());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_parse_toml_with_partial_sections() {
        let toml = r#"
            [airweave]
            collection_id = "docs"

            [llm]
            provider = "openai"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.airweave.collection_id(), Some("docs"));
        assert_eq!(config.airweave.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.llm.provider, LlmProvider::OpenAi);
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("Gemini".parse::<LlmProvider>().unwrap(), LlmProvider::Google);
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!("anthropic".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
        assert!("cohere".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn test_save_to_round_trips_settings_without_env_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();
        config.apply_env(env(&[
            ("AIRWEAVE_API_KEY", "env-key"),
            ("OPENAI_API_KEY", "sk-env"),
        ]));
        config.airweave.collection_id = Some("hr-policies".to_string());
        config.search.default_mode = SearchMode::Keyword;
        config.search.limit = 25;
        config.llm.provider = LlmProvider::OpenAi;

        config.save_to(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(!text.contains("env-key"));
        assert!(!text.contains("sk-env"));

        let saved = Config::from_file(&path).unwrap();
        assert_eq!(saved.airweave.api_key(), None);
        assert_eq!(saved.airweave.collection_id(), Some("hr-policies"));
        assert_eq!(saved.search.default_mode, SearchMode::Keyword);
        assert_eq!(saved.search.limit, 25);
        assert_eq!(saved.llm.provider, LlmProvider::OpenAi);
    }

    #[test]
    fn test_save_to_keeps_keys_already_in_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[airweave]\napi_key = \"file-key\"\n\n[search]\nlimit = 5\n",
        )
        .unwrap();

        let mut config = Config::from_file(&path).unwrap();
        config.apply_env(env(&[("AIRWEAVE_API_KEY", "env-key")]));
        config.search.limit = 12;
        config.save_to(&path).unwrap();

        let saved = Config::from_file(&path).unwrap();
        assert_eq!(saved.airweave.api_key(), Some("file-key"));
        assert_eq!(saved.search.limit, 12);
    }
}
