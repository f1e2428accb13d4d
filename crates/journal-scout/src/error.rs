//! Error types for journal-scout
//!
//! The ranking core (normalize, classify, search, related) never fails;
//! these errors only come out of dataset loading, configuration and the CLI.

use thiserror::Error;

/// Result type alias for journal-scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Main error type for journal-scout operations
///
/// Payloads are plain strings so a failed load can be handed to every
/// caller that awaited it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoutError {
    /// Reading a local data file failed
    #[error("IO error: {0}")]
    Io(String),

    /// Fetching a remote data source failed
    #[error("HTTP error: {0}")]
    Http(String),

    /// The data source is not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// The JSON parsed but has the wrong shape (e.g. `journals` is not an array)
    #[error("Invalid payload from {source_path}: {reason}")]
    InvalidPayload { source_path: String, reason: String },

    /// Every candidate data source failed; carries the last failure
    #[error("All {attempts} data sources failed, last error: {last}")]
    AllSourcesFailed { attempts: usize, last: Box<ScoutError> },

    /// No data source was configured at all
    #[error("No data sources configured")]
    NoSources,

    /// Configuration is invalid or unreadable
    #[error("Config error: {0}")]
    Config(String),

    /// A journal id was not found in the catalog
    #[error("Journal not found: {0}")]
    NotFound(String),
}

impl From<std::io::Error> for ScoutError {
    fn from(err: std::io::Error) -> Self {
        ScoutError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        ScoutError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        ScoutError::Http(err.to_string())
    }
}

impl From<toml::de::Error> for ScoutError {
    fn from(err: toml::de::Error) -> Self {
        ScoutError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ScoutError {
    fn from(err: toml::ser::Error) -> Self {
        ScoutError::Config(err.to_string())
    }
}
