//! Fixed, non-overlapping buckets `[k * w, (k + 1) * w)`
//!
//! One pass over sorted events. A burst that straddles a bucket edge is split
//! between two records and each half is counted on its own.

use crate::aggregate::sample::{truncate_message, MAX_SAMPLE_MESSAGES};
use crate::core::event::Event;
use crate::core::temporal::Timestamp;
use crate::core::window::WindowRecord;
use std::collections::HashSet;

/// Compute tumbling records for `events`, which must be sorted by time.
/// Only buckets with more than `threshold` distinct authors are returned.
pub(crate) fn tumbling_windows(
    events: &[Event],
    window_size: u64,
    threshold: usize,
) -> Vec<WindowRecord> {
    let bucket_of = |e: &Event| e.time.as_secs() / window_size;

    events
        .chunk_by(|a, b| bucket_of(a) == bucket_of(b))
        .filter_map(|bucket| {
            let mut seen = HashSet::new();
            let mut sample = Vec::new();
            for event in bucket {
                if seen.insert(event.author.as_str()) && sample.len() < MAX_SAMPLE_MESSAGES {
                    sample.push(truncate_message(event.text()));
                }
            }

            if seen.len() <= threshold {
                return None;
            }
            let start = Timestamp::from_secs(bucket_of(&bucket[0]) * window_size);
            Some(WindowRecord::new(start, seen.len(), bucket.len(), sample))
        })
        .collect()
}
