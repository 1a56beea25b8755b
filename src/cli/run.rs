//! Command execution

use crate::aggregate::{aggregate, WindowParams, WindowPolicy};
use crate::analysis::{spawn_analysis, AnalysisReport};
use crate::cli::commands::{AnalysisArgs, Cli, Commands, IngestArgs};
use crate::config::{AnalysisConfig, Config};
use crate::core::event::EventTable;
use crate::core::temporal::Timestamp;
use crate::error::Result;
use crate::ingest::{load_csv, parse_stream_id};
use crate::report::{
    peak_rows, render_inspection, render_leaderboard, render_rows, series_rows, Inspection,
    OutputFormat,
};
use crate::stats::chatter_leaderboard;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Run one CLI invocation, writing the report to stdout
pub async fn execute(cli: Cli) -> Result<()> {
    let mut out = io::stdout();
    run_command(cli, &mut out).await
}

/// Run one CLI invocation, writing the report to `out`
pub async fn run_command<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            csv,
            ingest,
            analysis,
            chronological,
            format,
        } => {
            let report = analyze(&csv, &config, &ingest, &analysis).await?;
            if format == OutputFormat::Table {
                write_header(out, &csv, &report)?;
            }
            render_rows(&peak_rows(&report.peaks, chronological), format, out)?;
        }
        Commands::Series {
            csv,
            ingest,
            analysis,
            format,
        } => {
            let report = analyze(&csv, &config, &ingest, &analysis).await?;
            if format == OutputFormat::Table {
                write_header(out, &csv, &report)?;
            }
            render_rows(&series_rows(&report.series), format, out)?;
        }
        Commands::Inspect {
            csv,
            ingest,
            at,
            window,
            format,
        } => {
            let table = load(&csv, &config, &ingest)?;
            let window_size = window.unwrap_or(config.analysis.window_size);
            // always the look-back window ending at `at`, whatever the configured policy
            let params = WindowParams::new(window_size, WindowPolicy::Sliding, 0)?;

            let at = Timestamp::from_secs(at);
            let start = at.saturating_sub_secs(params.window_size());
            let events = table.events_between(start, at);

            let in_window = EventTable::new(events.to_vec())?;
            let record = aggregate(&in_window, &params)
                .into_iter()
                .find(|r| r.time == at);
            if record.is_none() {
                info!(at = at.as_secs(), "no event at the inspected moment");
            }

            let inspection = Inspection::new(start, at, record.as_ref(), events);
            render_inspection(&inspection, format, out)?;
        }
        Commands::Chatters {
            csv,
            ingest,
            limit,
            format,
        } => {
            let mut ingest_config = config.ingest.clone();
            ingest.apply(&mut ingest_config);
            // replies are chat activity too
            ingest_config.filter_replies = false;

            let table = load_csv(&csv, &ingest_config)?;
            let mut board = chatter_leaderboard(&table);
            board.truncate(limit);
            render_leaderboard(&board, format, out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load(csv: &Path, config: &Config, ingest: &IngestArgs) -> Result<EventTable> {
    let mut ingest_config = config.ingest.clone();
    ingest.apply(&mut ingest_config);
    load_csv(csv, &ingest_config)
}

async fn analyze(
    csv: &Path,
    config: &Config,
    ingest: &IngestArgs,
    args: &AnalysisArgs,
) -> Result<AnalysisReport> {
    let mut analysis: AnalysisConfig = config.analysis;
    args.apply(&mut analysis);
    // fail on bad parameters before reading a large file
    analysis.validate()?;

    let table = Arc::new(load(csv, config, ingest)?);
    let task = spawn_analysis(table, analysis)?;

    let token = task.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling analysis");
            token.cancel();
        }
    });

    let result = task.join().await;
    interrupt.abort();

    let report = result?;
    info!(run_id = %report.run_id, peaks = report.peaks.len(), "report ready");
    Ok(report)
}

fn write_header<W: Write>(out: &mut W, csv: &Path, report: &AnalysisReport) -> Result<()> {
    let name = csv
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stream = parse_stream_id(&name)
        .map(|id| format!(" (stream {id})"))
        .unwrap_or_default();

    writeln!(
        out,
        "{name}{stream}: {} events, {} window, {}s, threshold > {}, slack {}s, top {}",
        report.event_count,
        report.policy,
        report.window_size,
        report.ignore_threshold,
        report.slack,
        report.top_n
    )?;
    writeln!(out)?;
    Ok(())
}
