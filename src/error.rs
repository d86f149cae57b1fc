//! Error types for sbrule.

use thiserror::Error;

/// Error type for sbrule operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for sbrule operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for a single source download.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, timeout or redirect failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Response body could not be read as text
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// URL of the source that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Body { url, .. } => url,
        }
    }
}

/// Error type for a rule line that cannot be converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    /// Rule type token is not one of the supported kinds
    #[error("unsupported rule type: {0}")]
    Unsupported(String),

    /// Typed rule without a usable type or value
    #[error("malformed rule: {0}")]
    Malformed(String),
}
