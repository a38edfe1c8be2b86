//! Configuration loading, validation, and management for mazewalk.
//!
//! Loads configuration from `~/.mazewalk/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.mazewalk/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tree construction settings
    #[serde(default)]
    pub tree: TreeConfig,

    /// Guided search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Document fragmentation settings
    #[serde(default)]
    pub fragment: FragmentConfig,

    /// Built-in model settings
    #[serde(default)]
    pub models: ModelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum children per internal node.
    #[serde(default = "default_width")]
    pub width: usize,

    /// Content at or below this many characters is wrapped as a single-leaf
    /// tree instead of being clustered.
    #[serde(default = "default_single_window_chars")]
    pub single_window_chars: usize,
}

fn default_width() -> usize {
    3
}
fn default_single_window_chars() -> usize {
    2000
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            single_window_chars: default_single_window_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Show leaf candidates to the evaluator with their original text.
    #[serde(default)]
    pub original_text: bool,

    /// Collect a chosen leaf's siblings along with it.
    #[serde(default)]
    pub fuzz: bool,
}

fn default_top_k() -> usize {
    3
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            original_text: false,
            fuzz: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FragmentConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    #[serde(default)]
    pub overlap: usize,

    #[serde(default)]
    pub merge: bool,
}

fn default_max_chars() -> usize {
    512
}

impl Default for FragmentConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            overlap: 0,
            merge: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Dimension of the hashing encoder's embeddings.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Longest summary the lead summarizer produces, in characters.
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,

    /// Cosine similarity below which the evaluator backtracks.
    #[serde(default = "default_min_relevance")]
    pub min_relevance: f32,
}

fn default_embedding_dim() -> usize {
    256
}
fn default_summary_chars() -> usize {
    240
}
fn default_min_relevance() -> f32 {
    0.05
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedding_dim: default_embedding_dim(),
            summary_chars: default_summary_chars(),
            min_relevance: default_min_relevance(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.mazewalk/config.toml).
    ///
    /// Environment variables override the file:
    /// - `MAZEWALK_WIDTH`
    /// - `MAZEWALK_TOP_K`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (the process environment in [`load`](Self::load)).
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(width) = lookup("MAZEWALK_WIDTH") {
            self.tree.width = parse_env("MAZEWALK_WIDTH", &width)?;
        }
        if let Some(top_k) = lookup("MAZEWALK_TOP_K") {
            self.search.top_k = parse_env("MAZEWALK_TOP_K", &top_k)?;
        }
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mazewalk")
    }

    /// Get the configuration file path.
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tree.width < 2 {
            return Err(ConfigError::ValidationError(
                "tree.width must be at least 2".into(),
            ));
        }

        if self.search.top_k == 0 {
            return Err(ConfigError::ValidationError(
                "search.top_k must be at least 1".into(),
            ));
        }

        if self.fragment.max_chars == 0 {
            return Err(ConfigError::ValidationError(
                "fragment.max_chars must be > 0".into(),
            ));
        }

        if self.fragment.overlap >= self.fragment.max_chars {
            return Err(ConfigError::ValidationError(
                "fragment.overlap must be smaller than fragment.max_chars".into(),
            ));
        }

        if self.models.embedding_dim == 0 {
            return Err(ConfigError::ValidationError(
                "models.embedding_dim must be > 0".into(),
            ));
        }

        if self.models.summary_chars == 0 {
            return Err(ConfigError::ValidationError(
                "models.summary_chars must be > 0".into(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.models.min_relevance) {
            return Err(ConfigError::ValidationError(
                "models.min_relevance must be between -1.0 and 1.0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `config show --defaults`).
    pub fn default_toml() -> String {
        Self::default().to_toml()
    }

    /// Render this configuration as TOML.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}

fn parse_env(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse().map_err(|_| {
        ConfigError::ValidationError(format!("{key} must be a non-negative integer, got {value:?}"))
    })
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
