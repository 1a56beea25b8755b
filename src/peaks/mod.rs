//! Peak selection: the most intense moments, kept apart by a minimum gap
//!
//! Greedy, in the order of `unique_user_count` descending and `time`
//! ascending. A candidate is accepted unless an already accepted peak lies
//! within `slack` seconds of it (inclusive). Rejected candidates are never
//! reconsidered, so the result is not guaranteed to maximize total activity.

use crate::core::temporal::Timestamp;
use crate::core::window::{Peak, WindowRecord};
use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use tracing::debug;

/// Validated selection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakParams {
    slack: u64,
    top_n: usize,
}

impl PeakParams {
    /// Validate raw parameters: `slack >= 0` and `top_n > 0`
    pub fn new(slack: i64, top_n: i64) -> Result<Self> {
        let slack = u64::try_from(slack)
            .map_err(|_| Error::InvalidParameter(format!("slack must be >= 0, got {slack}")))?;
        if top_n <= 0 {
            return Err(Error::InvalidParameter(format!(
                "top_n must be positive, got {top_n}"
            )));
        }

        Ok(Self {
            slack,
            top_n: top_n as usize,
        })
    }

    /// Minimum separation in seconds
    pub fn slack(&self) -> u64 {
        self.slack
    }

    /// Maximum number of peaks
    pub fn top_n(&self) -> usize {
        self.top_n
    }
}

/// Select up to `top_n` peaks from `records`.
///
/// Peaks come back in selection order with ranks starting at 1. Sort by
/// `time` afterwards for a chronological view.
pub fn select_peaks(records: &[WindowRecord], params: &PeakParams) -> Vec<Peak> {
    let mut candidates: Vec<&WindowRecord> = records.iter().collect();
    candidates.sort_by_key(|r| (Reverse(r.unique_user_count), r.time));

    let mut chosen_times: BTreeSet<Timestamp> = BTreeSet::new();
    let mut peaks = Vec::with_capacity(params.top_n.min(records.len()));

    for candidate in candidates {
        if peaks.len() >= params.top_n {
            break;
        }

        let lo = candidate.time.saturating_sub_secs(params.slack);
        let hi = candidate.time.saturating_add_secs(params.slack);
        if chosen_times.range(lo..=hi).next().is_some() {
            continue;
        }

        chosen_times.insert(candidate.time);
        peaks.push(Peak {
            rank: peaks.len() + 1,
            record: candidate.clone(),
        });
    }

    debug!(
        candidates = records.len(),
        selected = peaks.len(),
        slack = params.slack,
        top_n = params.top_n,
        "selected peaks"
    );

    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(secs: u64, count: usize) -> WindowRecord {
        WindowRecord::new(Timestamp::from_secs(secs), count, count, Vec::new())
    }

    fn summary(peaks: &[Peak]) -> Vec<(u64, usize)> {
        peaks
            .iter()
            .map(|p| (p.time().as_secs(), p.unique_user_count()))
            .collect()
    }

    #[test]
    fn test_params_validation() {
        assert!(matches!(PeakParams::new(-1, 3), Err(Error::InvalidParameter(_))));
        assert!(matches!(PeakParams::new(30, 0), Err(Error::InvalidParameter(_))));
        assert!(matches!(PeakParams::new(30, -2), Err(Error::InvalidParameter(_))));

        let params = PeakParams::new(0, 1).unwrap();
        assert_eq!(params.slack(), 0);
        assert_eq!(params.top_n(), 1);
    }

    #[test]
    fn test_worked_example() {
        let records = vec![rec(10, 5), rec(20, 9), rec(25, 7), rec(100, 3)];
        let peaks = select_peaks(&records, &PeakParams::new(30, 3).unwrap());

        // (25,7) and (10,5) sit within 30s of (20,9); only (100,3) survives
        assert_eq!(summary(&peaks), vec![(20, 9), (100, 3)]);
        assert_eq!(peaks[0].rank, 1);
        assert_eq!(peaks[1].rank, 2);
    }

    #[test]
    fn test_slack_is_inclusive() {
        let records = vec![rec(0, 5), rec(30, 4), rec(31, 3)];
        let peaks = select_peaks(&records, &PeakParams::new(30, 10).unwrap());
        assert_eq!(summary(&peaks), vec![(0, 5), (31, 3)]);
    }

    #[test]
    fn test_ties_break_on_earlier_time() {
        let records = vec![rec(500, 4), rec(100, 4), rec(300, 4)];
        let peaks = select_peaks(&records, &PeakParams::new(10, 2).unwrap());
        assert_eq!(summary(&peaks), vec![(100, 4), (300, 4)]);
    }

    #[test]
    fn test_zero_slack_allows_neighbours() {
        let records = vec![rec(1, 2), rec(2, 2), rec(3, 1)];
        let peaks = select_peaks(&records, &PeakParams::new(0, 5).unwrap());
        assert_eq!(peaks.len(), 3);
    }

    #[test]
    fn test_stops_at_top_n() {
        let records: Vec<_> = (0..10).map(|i| rec(i * 100, 10 - i as usize)).collect();
        let peaks = select_peaks(&records, &PeakParams::new(5, 4).unwrap());
        assert_eq!(summary(&peaks), vec![(0, 10), (100, 9), (200, 8), (300, 7)]);
    }

    #[test]
    fn test_empty_records() {
        assert!(select_peaks(&[], &PeakParams::new(30, 5).unwrap()).is_empty());
    }

    fn arb_records() -> impl Strategy<Value = Vec<WindowRecord>> {
        prop::collection::btree_map(0u64..2_000, 1usize..50, 0..80)
            .prop_map(|m| m.into_iter().map(|(t, c)| rec(t, c)).collect())
    }

    proptest! {
        #[test]
        fn prop_separation_holds(records in arb_records(), slack in 0i64..200, top_n in 1i64..30) {
            let peaks = select_peaks(&records, &PeakParams::new(slack, top_n).unwrap());
            for (i, a) in peaks.iter().enumerate() {
                for b in &peaks[i + 1..] {
                    prop_assert!(a.time().abs_diff(b.time()) > slack as u64);
                }
            }
        }

        #[test]
        fn prop_cardinality_bounds(records in arb_records(), slack in 0i64..200, top_n in 1i64..30) {
            let peaks = select_peaks(&records, &PeakParams::new(slack, top_n).unwrap());
            prop_assert!(peaks.len() <= top_n as usize);
            prop_assert!(peaks.len() <= records.len());
        }

        #[test]
        fn prop_selection_is_deterministic(records in arb_records(), slack in 0i64..200) {
            let params = PeakParams::new(slack, 10).unwrap();
            let mut reversed = records.clone();
            reversed.reverse();
            prop_assert_eq!(select_peaks(&records, &params), select_peaks(&reversed, &params));
        }
    }
}
