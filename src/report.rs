//! Presentation contract: rows with jump-to-source times, rendered as text,
//! JSON or CSV

use crate::core::event::Event;
use crate::core::temporal::Timestamp;
use crate::core::window::{Peak, WindowRecord};
use crate::error::Result;
use crate::stats::ChatterStats;
use serde::Serialize;
use std::io::Write;

/// Chat reacts after the moment it reacts to; jump links start this far back
pub const JUMP_OFFSET_SECS: u64 = 30;

/// Widest message column in table output
const TABLE_MESSAGE_WIDTH: usize = 80;

/// Where to seek in the recording to see what triggered activity at `time`
pub fn jump_to_source(time: Timestamp) -> Timestamp {
    time.saturating_sub_secs(JUMP_OFFSET_SECS)
}

/// Output format for CLI reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

/// One displayable row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub time: u64,
    pub clock: String,
    pub jump: String,
    pub unique_users: usize,
    pub message_count: usize,
    pub messages: String,
}

impl ReportRow {
    fn build(rank: Option<usize>, record: &WindowRecord) -> Self {
        Self {
            rank,
            time: record.time.as_secs(),
            clock: record.time.to_clock(),
            jump: jump_to_source(record.time).to_clock(),
            unique_users: record.unique_user_count,
            message_count: record.message_count,
            messages: record.sample_messages.join(" | "),
        }
    }

    /// Row for a window record
    pub fn from_record(record: &WindowRecord) -> Self {
        Self::build(None, record)
    }

    /// Row for a selected peak
    pub fn from_peak(peak: &Peak) -> Self {
        Self::build(Some(peak.rank), &peak.record)
    }
}

/// Rows for peaks, optionally reordered by time
pub fn peak_rows(peaks: &[Peak], chronological: bool) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = peaks.iter().map(ReportRow::from_peak).collect();
    if chronological {
        rows.sort_by_key(|r| r.time);
    }
    rows
}

/// Rows for a whole series
pub fn series_rows(records: &[WindowRecord]) -> Vec<ReportRow> {
    records.iter().map(ReportRow::from_record).collect()
}

/// Render rows in the requested format
pub fn render_rows<W: Write>(rows: &[ReportRow], format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let with_rank = rows.iter().any(|r| r.rank.is_some());
            if with_rank {
                writeln!(
                    out,
                    "{:>4}  {:>8}  {:>8}  {:>5}  {:>5}  MESSAGES",
                    "RANK", "TIME", "JUMP", "USERS", "MSGS"
                )?;
            } else {
                writeln!(
                    out,
                    "{:>8}  {:>8}  {:>5}  {:>5}  MESSAGES",
                    "TIME", "JUMP", "USERS", "MSGS"
                )?;
            }
            for row in rows {
                let messages = shorten(&row.messages, TABLE_MESSAGE_WIDTH);
                match row.rank {
                    Some(rank) => writeln!(
                        out,
                        "{:>4}  {:>8}  {:>8}  {:>5}  {:>5}  {}",
                        rank, row.clock, row.jump, row.unique_users, row.message_count, messages
                    )?,
                    None => writeln!(
                        out,
                        "{:>8}  {:>8}  {:>5}  {:>5}  {}",
                        row.clock, row.jump, row.unique_users, row.message_count, messages
                    )?,
                }
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(rows, out)?,
    }
    Ok(())
}

/// Render the chatter leaderboard
pub fn render_leaderboard<W: Write>(
    board: &[ChatterStats],
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{:>4}  {:<25}  {:>8}  {:>6}", "#", "CHATTER", "MESSAGES", "UNIQUE")?;
            for (i, stats) in board.iter().enumerate() {
                writeln!(
                    out,
                    "{:>4}  {:<25}  {:>8}  {:>6}",
                    i + 1,
                    stats.author,
                    stats.message_count,
                    stats.unique_messages
                )?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, board)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => write_csv(board, out)?,
    }
    Ok(())
}

/// Raw event as shown by `inspect`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub time: u64,
    pub clock: String,
    pub author: String,
    pub message: String,
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            time: event.time.as_secs(),
            clock: event.time.to_clock(),
            author: event.author.clone(),
            message: event.text().to_string(),
        }
    }
}

/// The window ending at one moment: its anchored record, if any, and its events
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspection {
    pub at: u64,
    pub start: u64,
    pub jump: String,
    pub record: Option<ReportRow>,
    pub events: Vec<EventRow>,
}

impl Inspection {
    /// `record` must be anchored at `at`; it is absent when no event lands exactly there
    pub fn new(
        start: Timestamp,
        at: Timestamp,
        record: Option<&WindowRecord>,
        events: &[Event],
    ) -> Self {
        Self {
            at: at.as_secs(),
            start: start.as_secs(),
            jump: jump_to_source(at).to_clock(),
            record: record.map(ReportRow::from_record),
            events: events.iter().map(EventRow::from).collect(),
        }
    }
}

/// Render an inspected window: the record first, then its raw events
pub fn render_inspection<W: Write>(
    inspection: &Inspection,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            let start = Timestamp::from_secs(inspection.start).to_clock();
            let at = Timestamp::from_secs(inspection.at).to_clock();
            match &inspection.record {
                Some(row) => {
                    writeln!(
                        out,
                        "window [{start}, {at}]: {} unique chatters, {} messages, jump to {}",
                        row.unique_users, row.message_count, inspection.jump
                    )?;
                    writeln!(out, "sample: {}", shorten(&row.messages, TABLE_MESSAGE_WIDTH))?;
                }
                None => writeln!(
                    out,
                    "window [{start}, {at}]: no window record anchored at {at}, jump to {}",
                    inspection.jump
                )?,
            }
            writeln!(out)?;
            for row in &inspection.events {
                writeln!(out, "{:>8}  {:<25}  {}", row.clock, row.author, row.message)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, inspection)?;
            writeln!(out)?;
        }
        OutputFormat::Csv => {
            // two tables: the record (header only when absent), then the events
            let records: Vec<&ReportRow> = inspection.record.iter().collect();
            if records.is_empty() {
                writeln!(out, "time,clock,jump,unique_users,message_count,messages")?;
            } else {
                write_csv(&records, &mut *out)?;
            }
            writeln!(out)?;
            write_csv(&inspection.events, &mut *out)?;
        }
    }
    Ok(())
}

fn write_csv<T: Serialize, W: Write>(items: &[T], out: &mut W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().from_writer(out);
    for item in items {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

fn shorten(text: &str, width: usize) -> String {
    match text.char_indices().nth(width.saturating_sub(3)) {
        Some((cut, _)) if text.chars().count() > width => format!("{}...", &text[..cut]),
        _ => text.to_string(),
    }
}
