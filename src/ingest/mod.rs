//! Loading and filtering chat exports into an [`EventTable`]

pub mod csv_log;

pub use csv_log::read_events;

use crate::config::IngestConfig;
use crate::core::event::{Event, EventTable};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Load a CSV chat export and apply the ingest filters
pub fn load_csv(path: &Path, config: &IngestConfig) -> Result<EventTable> {
    let file = File::open(path)
        .map_err(|e| Error::Ingest(format!("cannot open {}: {e}", path.display())))?;
    let raw = read_events(BufReader::new(file))?;
    let raw_count = raw.len();

    let table = build_table(raw, config)?;
    info!(
        path = %path.display(),
        rows = raw_count,
        events = table.len(),
        authors = table.distinct_authors(),
        "loaded chat log"
    );
    Ok(table)
}

/// Apply author, prefix and range filters, then build the table
pub fn build_table(events: Vec<Event>, config: &IngestConfig) -> Result<EventTable> {
    let range = config.range()?;
    let before = events.len();

    let kept: Vec<Event> = events
        .into_iter()
        .filter(|e| !config.is_excluded_author(&e.author))
        .filter(|e| !config.is_filtered_message(e.text()))
        .filter(|e| range.map_or(true, |r| r.contains(e.time)))
        .collect();

    debug!(before, after = kept.len(), "filtered chat events");

    match range {
        Some(range) => EventTable::with_range(kept, range),
        None => EventTable::new(kept),
    }
}

static STREAM_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("valid stream id pattern"));

/// Recording id embedded in an export's file name, e.g. `1828948529.csv`
pub fn parse_stream_id(file_name: &str) -> Option<u64> {
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    STREAM_ID.find(stem)?.as_str().parse().ok()
}
