//! Window aggregation: distinct-author counts over a time-indexed event stream
//!
//! One entry point, [`aggregate`], with the windowing strategy chosen by
//! [`WindowPolicy`]:
//!
//! - **Sliding**: one record per distinct event time `t`, covering the closed
//!   interval `[t - window_size, t]`.
//! - **Tumbling**: one record per non-empty bucket `[k * w, (k + 1) * w)`,
//!   anchored at the bucket start.
//!
//! Both policies keep only records whose count is strictly greater than
//! `ignore_threshold`.

pub mod sample;
mod sliding;
mod tumbling;

pub use sample::{truncate_message, MAX_SAMPLE_CHARS, MAX_SAMPLE_MESSAGES};

use crate::core::event::EventTable;
use crate::core::window::WindowRecord;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Windowing strategy
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum WindowPolicy {
    /// Window ends at every event's own timestamp
    #[default]
    Sliding,
    /// Fixed-size, non-overlapping buckets starting at 0
    Tumbling,
}

impl fmt::Display for WindowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sliding => f.write_str("sliding"),
            Self::Tumbling => f.write_str("tumbling"),
        }
    }
}

impl FromStr for WindowPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sliding" => Ok(Self::Sliding),
            "tumbling" => Ok(Self::Tumbling),
            other => Err(Error::InvalidParameter(format!(
                "unknown window policy '{other}', expected 'sliding' or 'tumbling'"
            ))),
        }
    }
}

/// Validated aggregation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowParams {
    window_size: u64,
    policy: WindowPolicy,
    ignore_threshold: usize,
}

impl WindowParams {
    /// Validate raw parameters: `window_size > 0` and `ignore_threshold >= 0`
    pub fn new(window_size: i64, policy: WindowPolicy, ignore_threshold: i64) -> Result<Self> {
        if window_size <= 0 {
            return Err(Error::InvalidParameter(format!(
                "window_size must be positive, got {window_size}"
            )));
        }
        let ignore_threshold = usize::try_from(ignore_threshold).map_err(|_| {
            Error::InvalidParameter(format!(
                "ignore_threshold must be >= 0, got {ignore_threshold}"
            ))
        })?;

        Ok(Self {
            window_size: window_size as u64,
            policy,
            ignore_threshold,
        })
    }

    /// Window width in seconds
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Windowing strategy
    pub fn policy(&self) -> WindowPolicy {
        self.policy
    }

    /// Records with this many authors or fewer are dropped
    pub fn ignore_threshold(&self) -> usize {
        self.ignore_threshold
    }
}

/// Aggregate `table` into window records, sorted by time
pub fn aggregate(table: &EventTable, params: &WindowParams) -> Vec<WindowRecord> {
    let events = table.events();
    let records = match params.policy {
        WindowPolicy::Sliding => {
            sliding::sliding_windows(events, params.window_size, params.ignore_threshold)
        }
        WindowPolicy::Tumbling => {
            tumbling::tumbling_windows(events, params.window_size, params.ignore_threshold)
        }
    };

    debug!(
        policy = %params.policy,
        window_size = params.window_size,
        ignore_threshold = params.ignore_threshold,
        events = events.len(),
        records = records.len(),
        "aggregated event table"
    );

    records
}
