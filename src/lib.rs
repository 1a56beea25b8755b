//! Chat-Peaks: find the moments a chat audience got excited
//!
//! Counts distinct chatters inside a trailing (sliding) or fixed (tumbling)
//! time window for every instant of a recorded chat log, then picks the most
//! intense moments while keeping reported moments apart by a minimum gap.
//!
//! # Core Concepts
//!
//! - **Events**: Immutable `(time, author, message)` records in an [`core::EventTable`]
//! - **Window Records**: Unique-author counts plus a message preview per window instant
//! - **Peaks**: Greedily selected records, pairwise more than `slack` seconds apart
//!
//! # Example
//!
//! ```
//! use chat_peaks::prelude::*;
//!
//! # fn example() -> chat_peaks::error::Result<()> {
//! let table = EventTable::new(vec![
//!     Event::message(10, "alice", "no way"),
//!     Event::message(12, "bob", "CLIP IT"),
//!     Event::message(300, "carol", "gg"),
//! ])?;
//!
//! let window = WindowParams::new(12, WindowPolicy::Sliding, 0)?;
//! let series = aggregate(&table, &window);
//! let peaks = select_peaks(&series, &PeakParams::new(60, 5)?);
//!
//! assert_eq!(peaks[0].time(), Timestamp::from_secs(12));
//! assert_eq!(peaks[0].unique_user_count(), 2);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod aggregate;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod peaks;
pub mod report;
pub mod stats;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::aggregate::{aggregate, WindowParams, WindowPolicy};
    pub use crate::analysis::{spawn_analysis, AnalysisReport, Analyzer};
    pub use crate::config::{AnalysisConfig, Config, IngestConfig};
    pub use crate::core::*;
    pub use crate::error::{Error, Result};
    pub use crate::peaks::{select_peaks, PeakParams};
}
