//! One analysis run: aggregate an event table, then pick its peaks

use crate::aggregate::{aggregate, WindowParams, WindowPolicy};
use crate::config::AnalysisConfig;
use crate::core::event::EventTable;
use crate::core::window::{Peak, WindowRecord};
use crate::error::{Error, Result};
use crate::peaks::{select_peaks, PeakParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span};
use uuid::Uuid;

/// Result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub window_size: u64,
    pub policy: WindowPolicy,
    pub ignore_threshold: usize,
    pub slack: u64,
    pub top_n: usize,
    /// Events in the analysed table
    pub event_count: usize,
    /// Window records, sorted by time
    pub series: Vec<WindowRecord>,
    /// Peaks in selection order
    pub peaks: Vec<Peak>,
}

/// Validated, reusable analysis parameters
#[derive(Debug, Clone, Copy)]
pub struct Analyzer {
    window: WindowParams,
    peaks: PeakParams,
}

impl Analyzer {
    /// Validate every parameter up front
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let (window, peaks) = config.validate()?;
        Ok(Self { window, peaks })
    }

    /// Run synchronously to completion
    pub fn run(&self, table: &EventTable) -> AnalysisReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("analysis", %run_id, policy = %self.window.policy());
        let _guard = span.enter();

        let series = aggregate(table, &self.window);
        let peaks = select_peaks(&series, &self.peaks);

        info!(
            events = table.len(),
            records = series.len(),
            peaks = peaks.len(),
            "analysis finished"
        );

        AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            window_size: self.window.window_size(),
            policy: self.window.policy(),
            ignore_threshold: self.window.ignore_threshold(),
            slack: self.peaks.slack(),
            top_n: self.peaks.top_n(),
            event_count: table.len(),
            series,
            peaks,
        }
    }
}

/// Handle to an analysis running on a blocking worker
pub struct AnalysisTask {
    handle: JoinHandle<AnalysisReport>,
    cancel: CancellationToken,
}

impl AnalysisTask {
    /// Ask for the run to be abandoned. The worker finishes on its own and
    /// its result is dropped.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token that cancels this run when triggered
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Wait for completion or cancellation
    pub async fn join(self) -> Result<AnalysisReport> {
        let AnalysisTask { handle, cancel } = self;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            report = handle => Ok(report?),
        }
    }
}

/// Validate `config` and start the analysis on tokio's blocking pool.
///
/// Must be called from within a tokio runtime.
pub fn spawn_analysis(table: Arc<EventTable>, config: AnalysisConfig) -> Result<AnalysisTask> {
    let analyzer = Analyzer::new(config)?;
    let handle = tokio::task::spawn_blocking(move || analyzer.run(&table));
    Ok(AnalysisTask {
        handle,
        cancel: CancellationToken::new(),
    })
}
