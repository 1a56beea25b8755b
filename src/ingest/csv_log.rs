//! CSV chat export reader
//!
//! Expects a header row with at least `time`, `user_name` and `message`.
//! Other columns are ignored. Rows that do not parse are skipped with a
//! warning rather than failing the whole load.

use crate::core::event::Event;
use crate::core::temporal::Timestamp;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::io::Read;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct ChatRow {
    time: i64,
    user_name: String,
    #[serde(default)]
    message: Option<String>,
}

/// Read raw events from any CSV source, before filtering
pub fn read_events<R: Read>(reader: R) -> Result<Vec<Event>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::Ingest(format!("cannot read CSV header: {e}")))?
        .clone();
    for required in ["time", "user_name", "message"] {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::Ingest(format!("missing required column '{required}'")));
        }
    }

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for (line, row) in csv_reader.deserialize::<ChatRow>().enumerate() {
        // header is line 1
        let line = line + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed chat row");
                skipped += 1;
                continue;
            }
        };

        let time = match Timestamp::try_from_secs(row.time) {
            Ok(time) => time,
            Err(_) => {
                warn!(line, time = row.time, "skipping chat row with negative time");
                skipped += 1;
                continue;
            }
        };

        let author = row.user_name.trim();
        if author.is_empty() {
            warn!(line, "skipping chat row without author");
            skipped += 1;
            continue;
        }

        let message = row.message.filter(|m| !m.is_empty());
        events.push(Event::new(time, author, message));
    }

    if skipped > 0 {
        warn!(skipped, kept = events.len(), "chat export contained unusable rows");
    }
    Ok(events)
}
