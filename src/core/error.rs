//! Error types for airsearch

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using airsearch's Error
pub type Result<T> = std::result::Result<T, Error>;

/// airsearch error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not configured: missing {missing}")]
    NotConfigured { missing: &'static str },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Airweave API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Config file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Input error: {message}")]
    Prompt { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_carries_status() {
        let err = Error::Upstream {
            status: 500,
            body: "internal".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("internal"));
    }

    #[test]
    fn test_not_configured_names_missing_value() {
        let err = Error::NotConfigured {
            missing: "AIRWEAVE_API_KEY",
        };
        assert_eq!(err.to_string(), "Not configured: missing AIRWEAVE_API_KEY");
    }
}
