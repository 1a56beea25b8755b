//! Aggregation output: window records and selected peaks

use crate::core::temporal::Timestamp;
use serde::{Deserialize, Serialize};

/// Unique-author activity for one window instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRecord {
    /// Right edge for sliding windows, bucket start for tumbling windows
    pub time: Timestamp,
    /// Distinct authors inside the window
    pub unique_user_count: usize,
    /// Messages inside the window, repeats included
    #[serde(default)]
    pub message_count: usize,
    /// One message per distinct author, in author first-seen order
    pub sample_messages: Vec<String>,
}

impl WindowRecord {
    /// Create a new record
    pub fn new(
        time: Timestamp,
        unique_user_count: usize,
        message_count: usize,
        sample_messages: Vec<String>,
    ) -> Self {
        Self {
            time,
            unique_user_count,
            message_count,
            sample_messages,
        }
    }
}

/// A window record chosen by the peak selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Peak {
    /// 1-based position in selection order
    pub rank: usize,
    #[serde(flatten)]
    pub record: WindowRecord,
}

impl Peak {
    /// Get the anchored time
    pub fn time(&self) -> Timestamp {
        self.record.time
    }

    /// Get the unique author count
    pub fn unique_user_count(&self) -> usize {
        self.record.unique_user_count
    }
}
