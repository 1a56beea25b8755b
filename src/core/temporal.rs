//! Stream-relative time handling

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in a recording, in whole seconds since stream start
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp {
    secs: u64,
}

impl Timestamp {
    /// Stream start
    pub const ZERO: Timestamp = Timestamp { secs: 0 };

    /// Create a timestamp from seconds since stream start
    pub fn from_secs(secs: u64) -> Self {
        Self { secs }
    }

    /// Create a timestamp from a signed offset, rejecting negative values
    pub fn try_from_secs(secs: i64) -> Result<Self> {
        u64::try_from(secs)
            .map(Self::from_secs)
            .map_err(|_| Error::InvalidEvent(format!("time must be >= 0, got {secs}")))
    }

    /// Get seconds since stream start
    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Move back by `secs`, clamping at stream start
    pub fn saturating_sub_secs(&self, secs: u64) -> Self {
        Self {
            secs: self.secs.saturating_sub(secs),
        }
    }

    /// Move forward by `secs`
    pub fn saturating_add_secs(&self, secs: u64) -> Self {
        Self {
            secs: self.secs.saturating_add(secs),
        }
    }

    /// Absolute distance to another timestamp in seconds
    pub fn abs_diff(&self, other: Timestamp) -> u64 {
        self.secs.abs_diff(other.secs)
    }

    /// Format as `HH:MM:SS`. Hours keep counting past 24.
    pub fn to_clock(&self) -> String {
        let hours = self.secs / 3600;
        let minutes = (self.secs % 3600) / 60;
        let seconds = self.secs % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_clock())
    }
}

/// Closed analysis range `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: Timestamp,
    end: Timestamp,
}

impl TimeRange {
    /// Create a range, rejecting `start > end`
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidParameter(format!(
                "time range start {} is after end {}",
                start.as_secs(),
                end.as_secs()
            )));
        }
        Ok(Self { start, end })
    }

    /// Range with optional bounds; a missing bound is open
    pub fn bounded(start: Option<Timestamp>, end: Option<Timestamp>) -> Result<Self> {
        Self::new(
            start.unwrap_or(Timestamp::ZERO),
            end.unwrap_or(Timestamp::from_secs(u64::MAX)),
        )
    }

    /// Check if a timestamp is within this range (both ends inclusive)
    pub fn contains(&self, ts: Timestamp) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// Get the start timestamp
    pub fn start(&self) -> Timestamp {
        self.start
    }

    /// Get the end timestamp
    pub fn end(&self) -> Timestamp {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_creation() {
        let ts = Timestamp::from_secs(1000);
        assert_eq!(ts.as_secs(), 1000);
        assert!(Timestamp::try_from_secs(-1).is_err());
        assert_eq!(Timestamp::try_from_secs(7).unwrap().as_secs(), 7);
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(Timestamp::from_secs(0).to_clock(), "00:00:00");
        assert_eq!(Timestamp::from_secs(3725).to_clock(), "01:02:05");
        assert_eq!(Timestamp::from_secs(90_000).to_clock(), "25:00:00");
    }

    #[test]
    fn test_saturating_arithmetic() {
        let ts = Timestamp::from_secs(10);
        assert_eq!(ts.saturating_sub_secs(30), Timestamp::ZERO);
        assert_eq!(ts.saturating_sub_secs(4).as_secs(), 6);
        assert_eq!(ts.abs_diff(Timestamp::from_secs(4)), 6);
        assert_eq!(Timestamp::from_secs(4).abs_diff(ts), 6);
    }

    #[test]
    fn test_time_range() {
        let range = TimeRange::new(Timestamp::from_secs(100), Timestamp::from_secs(200)).unwrap();

        assert!(range.contains(Timestamp::from_secs(100)));
        assert!(range.contains(Timestamp::from_secs(200)));
        assert!(!range.contains(Timestamp::from_secs(99)));
        assert!(!range.contains(Timestamp::from_secs(201)));

        assert!(TimeRange::new(Timestamp::from_secs(5), Timestamp::from_secs(4)).is_err());

        let open = TimeRange::bounded(None, None).unwrap();
        assert!(open.contains(Timestamp::from_secs(u64::MAX)));
    }
}
