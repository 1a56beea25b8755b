//! Layered configuration: built-in defaults, an optional TOML file, CLI flags

use crate::aggregate::{WindowParams, WindowPolicy};
use crate::core::temporal::{TimeRange, Timestamp};
use crate::error::{Error, Result};
use crate::peaks::PeakParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Full configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub ingest: IngestConfig,
}

impl Config {
    /// Load from `path`, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse TOML text
    pub fn from_toml(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Raw analysis parameters as a caller supplies them
///
/// Values are signed so that out-of-range input reaches validation and is
/// reported instead of failing to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window width in seconds
    pub window_size: i64,
    pub window_policy: WindowPolicy,
    /// Drop window records with this many unique authors or fewer
    pub ignore_threshold: i64,
    /// Minimum gap between reported peaks in seconds
    pub slack: i64,
    pub top_n: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_size: 12,
            window_policy: WindowPolicy::Sliding,
            ignore_threshold: 0,
            slack: 120,
            top_n: 10,
        }
    }
}

impl AnalysisConfig {
    /// Validate into aggregation and selection parameters
    pub fn validate(&self) -> Result<(WindowParams, PeakParams)> {
        let window = WindowParams::new(self.window_size, self.window_policy, self.ignore_threshold)?;
        let peaks = PeakParams::new(self.slack, self.top_n)?;
        Ok((window, peaks))
    }
}

/// Filtering applied while loading a chat export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Authors dropped entirely, matched case-insensitively
    pub excluded_authors: Vec<String>,
    /// Bot command prefix
    pub command_prefix: String,
    /// Reply/mention prefix
    pub reply_prefix: String,
    /// Drop messages starting with `reply_prefix`
    pub filter_replies: bool,
    /// First second of the analysis range (inclusive)
    pub from: Option<u64>,
    /// Last second of the analysis range (inclusive)
    pub to: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            excluded_authors: vec!["nightbot".to_string()],
            command_prefix: "!".to_string(),
            reply_prefix: "@".to_string(),
            filter_replies: true,
            from: None,
            to: None,
        }
    }
}

impl IngestConfig {
    /// Analysis range, if either bound is set
    pub fn range(&self) -> Result<Option<TimeRange>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        TimeRange::bounded(
            self.from.map(Timestamp::from_secs),
            self.to.map(Timestamp::from_secs),
        )
        .map(Some)
    }

    /// Check whether an author is excluded
    pub fn is_excluded_author(&self, author: &str) -> bool {
        self.excluded_authors
            .iter()
            .any(|excluded| excluded.eq_ignore_ascii_case(author))
    }

    /// Check whether a message is dropped by prefix
    pub fn is_filtered_message(&self, message: &str) -> bool {
        let starts = |prefix: &str| !prefix.is_empty() && message.starts_with(prefix);
        starts(&self.command_prefix) || (self.filter_replies && starts(&self.reply_prefix))
    }
}
