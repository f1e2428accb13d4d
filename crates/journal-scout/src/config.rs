//! Configuration for journal-scout
//!
//! Where the catalog is loaded from and the default search and
//! related-journal limits.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};
use crate::related::DEFAULT_RELATED_LIMIT;
use crate::search::DEFAULT_SUGGESTION_LIMIT;

/// Data sources tried in order when no configuration says otherwise.
pub const DEFAULT_DATA_PATHS: &[&str] = &[
    "./data/search_index.json",
    "/data/search_index.json",
    "./xuankan/demo_site/data/search_index.json",
    "/xuankan/demo_site/data/search_index.json",
];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Catalog sources
    pub data: DataConfig,
    /// Suggestion settings
    pub search: SearchConfig,
    /// Related-journal settings
    pub related: RelatedConfig,
}

/// Catalog source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Candidate sources (file paths or http(s) URLs), tried in order
    pub paths: Vec<String>,
    /// Remember the last source that loaded and try it first next time
    pub remember_path: bool,
    /// Where the remembered source is stored; defaults to the user cache dir
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            paths: DEFAULT_DATA_PATHS.iter().map(|p| p.to_string()).collect(),
            remember_path: true,
            cache_file: None,
        }
    }
}

/// Suggestion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum suggestions per query
    pub suggestion_limit: usize,
    /// Minimum impact factor applied to every query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_if: Option<f64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            min_if: None,
        }
    }
}

/// Related-journal configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedConfig {
    /// Maximum related journals per pivot
    pub limit: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl ScoutConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScoutError::Config(e.to_string()))
    }

    /// Load and validate a configuration file; `.json` files are JSON, anything else TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ScoutError::Config(format!("{}: {}", path.display(), e)))?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::from_toml(&text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.data.paths.is_empty() {
            return Err(ScoutError::Config("data.paths must not be empty".to_string()));
        }
        if self.data.paths.iter().any(|p| p.trim().is_empty()) {
            return Err(ScoutError::Config("data.paths must not contain blank entries".to_string()));
        }

        if self.search.suggestion_limit == 0 {
            return Err(ScoutError::Config(
                "search.suggestion_limit must be at least 1".to_string(),
            ));
        }

        if let Some(min_if) = self.search.min_if {
            if !min_if.is_finite() || min_if < 0.0 {
                return Err(ScoutError::Config(
                    "search.min_if must be a non-negative number".to_string(),
                ));
            }
        }

        if self.related.limit == 0 {
            return Err(ScoutError::Config("related.limit must be at least 1".to_string()));
        }

        Ok(())
    }
}
