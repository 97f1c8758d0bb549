//! Configuration for the weld diff engine.
//!
//! All limits and heuristic constants are injectable rather than hard-coded;
//! the defaults match the values the engine was tuned with.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration: input/output ceilings and heuristic thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard ceiling on each input's size in bytes, checked before any work.
    pub max_content_size_bytes: usize,
    /// Maximum number of hunks collected per diff.
    pub max_hunks: usize,
    /// Maximum number of change records retained per hunk.
    pub max_changes_per_hunk: usize,
    /// Auto mode refines to word granularity when the diff has at most this
    /// many change records.
    pub word_threshold_lines: usize,
    /// Unchanged context lines kept on each side of a hunk when the caller
    /// does not specify one.
    pub default_context: usize,
    /// A replaced line with old/new similarity below this ratio is counted
    /// as one addition plus one deletion in the stats.
    pub split_similarity_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_content_size_bytes: 10 * 1024 * 1024,
            max_hunks: 1000,
            max_changes_per_hunk: 500,
            word_threshold_lines: 60,
            default_context: 3,
            split_similarity_threshold: 0.30,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_content_size_bytes == 0 {
            return Err(
                ConfigError::Invalid("max_content_size_bytes must be > 0".to_string()).into(),
            );
        }
        if self.max_hunks == 0 {
            return Err(ConfigError::Invalid("max_hunks must be > 0".to_string()).into());
        }
        if self.max_changes_per_hunk == 0 {
            return Err(ConfigError::Invalid("max_changes_per_hunk must be > 0".to_string()).into());
        }
        if !(0.0..=1.0).contains(&self.split_similarity_threshold) {
            return Err(ConfigError::Invalid(
                "split_similarity_threshold must be within 0.0..=1.0".to_string(),
            )
            .into());
        }
        Ok(())
    }
}

/// Diff granularity requested by the caller.
///
/// `Auto` resolves to `Word` for small diffs and `Line` for large ones; a
/// computed [`DiffResult`](crate::DiffResult) only ever carries `Line` or
/// `Word`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DiffMode {
    Line,
    Word,
    #[default]
    Auto,
}

/// Per-call options for diff and merge-preview computation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DiffOptions {
    /// Requested granularity.
    pub mode: DiffMode,
    /// Unchanged context lines per hunk side; falls back to
    /// `EngineConfig::default_context`.
    pub context: Option<usize>,
    /// Override for `EngineConfig::word_threshold_lines`.
    pub word_threshold_lines: Option<usize>,
    /// Convert HTML-looking input to plain text before diffing.
    pub extract_text_from_html: bool,
}
