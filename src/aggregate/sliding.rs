//! Sliding windows anchored at every distinct event time
//!
//! The window for an instant `t` is the closed interval `[t - w, t]`.
//! A two-pointer sweep keeps, per author, the in-window event indices in
//! arrival order. The ordered set `firsts` holds the earliest in-window index
//! of each author, which is exactly the sample order.

use crate::aggregate::sample::{truncate_message, MAX_SAMPLE_MESSAGES};
use crate::core::event::Event;
use crate::core::window::WindowRecord;
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Sweep state over a time-sorted event slice
struct SlidingState<'a> {
    events: &'a [Event],
    /// author -> in-window event indices, oldest first
    in_window: HashMap<&'a str, VecDeque<usize>>,
    /// front index of every non-empty deque
    firsts: BTreeSet<usize>,
}

impl<'a> SlidingState<'a> {
    fn new(events: &'a [Event]) -> Self {
        Self {
            events,
            in_window: HashMap::new(),
            firsts: BTreeSet::new(),
        }
    }

    fn admit(&mut self, index: usize) {
        let events = self.events;
        let deque = self
            .in_window
            .entry(events[index].author.as_str())
            .or_default();
        if deque.is_empty() {
            self.firsts.insert(index);
        }
        deque.push_back(index);
    }

    /// Evict the oldest in-window event. `index` must be that event.
    fn evict(&mut self, index: usize) {
        let events = self.events;
        let author = events[index].author.as_str();
        self.firsts.remove(&index);

        let next = match self.in_window.get_mut(author) {
            Some(deque) => {
                deque.pop_front();
                deque.front().copied()
            }
            None => return,
        };

        match next {
            Some(next) => {
                self.firsts.insert(next);
            }
            None => {
                self.in_window.remove(author);
            }
        }
    }

    fn distinct_authors(&self) -> usize {
        self.in_window.len()
    }

    fn sample(&self) -> Vec<String> {
        self.firsts
            .iter()
            .take(MAX_SAMPLE_MESSAGES)
            .map(|&i| truncate_message(self.events[i].text()))
            .collect()
    }
}

/// Compute sliding records for `events`, which must be sorted by time.
/// Only instants with more than `threshold` distinct authors are returned.
pub(crate) fn sliding_windows(
    events: &[Event],
    window_size: u64,
    threshold: usize,
) -> Vec<WindowRecord> {
    let mut state = SlidingState::new(events);
    let mut records = Vec::new();
    let mut left = 0;
    let mut right = 0;

    while right < events.len() {
        let t = events[right].time;
        while right < events.len() && events[right].time == t {
            state.admit(right);
            right += 1;
        }

        let lower = t.saturating_sub_secs(window_size);
        while events[left].time < lower {
            state.evict(left);
            left += 1;
        }

        let count = state.distinct_authors();
        if count > threshold {
            records.push(WindowRecord::new(t, count, right - left, state.sample()));
        }
    }

    records
}
