//! Chat events and the validated event table

use crate::core::temporal::{TimeRange, Timestamp};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Arrival time
    pub time: Timestamp,
    /// Author login
    pub author: String,
    /// Message text; exports occasionally carry rows without one
    pub message: Option<String>,
}

impl Event {
    /// Create a new event
    pub fn new(time: Timestamp, author: impl Into<String>, message: Option<String>) -> Self {
        Self {
            time,
            author: author.into(),
            message,
        }
    }

    /// Create an event with message text
    pub fn message(secs: u64, author: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(Timestamp::from_secs(secs), author, Some(text.into()))
    }

    /// Get the message text, treating a missing message as empty
    pub fn text(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }
}

/// Immutable, time-ordered collection of events for one analysis run
///
/// Events are stably sorted by time on construction, so iteration yields
/// arrival order: time ascending, ties in input order.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    events: Vec<Event>,
    range: Option<TimeRange>,
}

impl EventTable {
    /// Build a table, validating every author
    pub fn new(events: Vec<Event>) -> Result<Self> {
        Self::build(events, None)
    }

    /// Build a table whose events must all fall inside `range`
    pub fn with_range(events: Vec<Event>, range: TimeRange) -> Result<Self> {
        Self::build(events, Some(range))
    }

    fn build(mut events: Vec<Event>, range: Option<TimeRange>) -> Result<Self> {
        for (index, event) in events.iter().enumerate() {
            if event.author.trim().is_empty() {
                return Err(Error::InvalidEvent(format!(
                    "event #{index} at {}s has an empty author",
                    event.time.as_secs()
                )));
            }
            if let Some(range) = range {
                if !range.contains(event.time) {
                    return Err(Error::InvalidEvent(format!(
                        "event #{index} at {}s is outside the analysis range [{}, {}]",
                        event.time.as_secs(),
                        range.start().as_secs(),
                        range.end().as_secs()
                    )));
                }
            }
        }

        // sort_by_key is stable
        events.sort_by_key(|e| e.time);
        Ok(Self { events, range })
    }

    /// Empty table
    pub fn empty() -> Self {
        Self::default()
    }

    /// Events in arrival order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate events in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Analysis range the table was validated against, if any
    pub fn range(&self) -> Option<TimeRange> {
        self.range
    }

    /// Earliest event time
    pub fn first_time(&self) -> Option<Timestamp> {
        self.events.first().map(|e| e.time)
    }

    /// Latest event time
    pub fn last_time(&self) -> Option<Timestamp> {
        self.events.last().map(|e| e.time)
    }

    /// Events in `[start, end]`, in arrival order
    pub fn events_between(&self, start: Timestamp, end: Timestamp) -> &[Event] {
        if start > end {
            return &[];
        }
        let lo = self.events.partition_point(|e| e.time < start);
        let hi = self.events.partition_point(|e| e.time <= end);
        &self.events[lo..hi]
    }

    /// Number of distinct authors in the whole table
    pub fn distinct_authors(&self) -> usize {
        self.events
            .iter()
            .map(|e| e.author.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_sorts_stably() {
        let table = EventTable::new(vec![
            Event::message(20, "carol", "late"),
            Event::message(10, "alice", "first at 10"),
            Event::message(10, "bob", "second at 10"),
        ])
        .unwrap();

        let authors: Vec<_> = table.iter().map(|e| e.author.as_str()).collect();
        assert_eq!(authors, vec!["alice", "bob", "carol"]);
        assert_eq!(table.first_time(), Some(Timestamp::from_secs(10)));
        assert_eq!(table.last_time(), Some(Timestamp::from_secs(20)));
    }

    #[test]
    fn test_empty_author_rejected() {
        let err = EventTable::new(vec![Event::message(1, "  ", "hi")]).unwrap_err();
        assert!(matches!(err, Error::InvalidEvent(_)));
    }

    #[test]
    fn test_range_validation() {
        let range = TimeRange::new(Timestamp::from_secs(10), Timestamp::from_secs(20)).unwrap();

        assert!(EventTable::with_range(vec![Event::message(10, "a", "x")], range).is_ok());
        assert!(EventTable::with_range(vec![Event::message(20, "a", "x")], range).is_ok());

        let err = EventTable::with_range(vec![Event::message(21, "a", "x")], range).unwrap_err();
        assert!(matches!(err, Error::InvalidEvent(_)));
    }

    #[test]
    fn test_events_between() {
        let table = EventTable::new(vec![
            Event::message(0, "a", "x"),
            Event::message(5, "b", "x"),
            Event::message(10, "c", "x"),
            Event::message(15, "d", "x"),
        ])
        .unwrap();

        let slice = table.events_between(Timestamp::from_secs(5), Timestamp::from_secs(10));
        assert_eq!(slice.len(), 2);
        assert!(table
            .events_between(Timestamp::from_secs(11), Timestamp::from_secs(3))
            .is_empty());
    }

    #[test]
    fn test_missing_message_text() {
        let event = Event::new(Timestamp::from_secs(3), "a", None);
        assert_eq!(event.text(), "");
    }

    #[test]
    fn test_distinct_authors() {
        let table = EventTable::new(vec![
            Event::message(1, "a", "x"),
            Event::message(2, "a", "y"),
            Event::message(3, "b", "z"),
        ])
        .unwrap();
        assert_eq!(table.distinct_authors(), 2);
        assert!(EventTable::empty().is_empty());
    }
}
