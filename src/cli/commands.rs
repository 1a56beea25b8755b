//! CLI commands

use crate::aggregate::WindowPolicy;
use crate::config::{AnalysisConfig, IngestConfig};
use crate::report::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Chat-Peaks CLI
#[derive(Parser, Debug)]
#[command(name = "chat-peaks")]
#[command(about = "Find the most active moments of a recorded chat log")]
#[command(version)]
pub struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank the most active moments
    Analyze {
        /// Chat export (CSV with time, user_name, message)
        csv: PathBuf,
        #[command(flatten)]
        ingest: IngestArgs,
        #[command(flatten)]
        analysis: AnalysisArgs,
        /// List peaks by time instead of by rank
        #[arg(long)]
        chronological: bool,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print every window record
    Series {
        /// Chat export (CSV with time, user_name, message)
        csv: PathBuf,
        #[command(flatten)]
        ingest: IngestArgs,
        #[command(flatten)]
        analysis: AnalysisArgs,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show the messages in the window ending at a moment
    Inspect {
        /// Chat export (CSV with time, user_name, message)
        csv: PathBuf,
        #[command(flatten)]
        ingest: IngestArgs,
        /// Moment to inspect, in seconds from stream start
        #[arg(long)]
        at: u64,
        /// Seconds to look back
        #[arg(short, long, allow_negative_numbers = true)]
        window: Option<i64>,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Rank chatters by message count
    Chatters {
        /// Chat export (CSV with time, user_name, message)
        csv: PathBuf,
        #[command(flatten)]
        ingest: IngestArgs,
        /// Number of chatters to show
        #[arg(short, long, default_value = "25")]
        limit: usize,
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

/// Loading overrides
#[derive(Args, Debug, Clone, Default)]
pub struct IngestArgs {
    /// First second to analyse (inclusive)
    #[arg(long)]
    pub from: Option<u64>,
    /// Last second to analyse (inclusive)
    #[arg(long)]
    pub to: Option<u64>,
    /// Keep messages that start with the reply prefix
    #[arg(long)]
    pub include_replies: bool,
}

impl IngestArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut IngestConfig) {
        if self.from.is_some() {
            config.from = self.from;
        }
        if self.to.is_some() {
            config.to = self.to;
        }
        if self.include_replies {
            config.filter_replies = false;
        }
    }
}

/// Analysis overrides
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    /// Window size in seconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub window: Option<i64>,
    /// Windowing policy
    #[arg(short, long, value_enum)]
    pub policy: Option<WindowPolicy>,
    /// Ignore moments with this many unique chatters or fewer
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<i64>,
    /// Minimum seconds between reported moments
    #[arg(short, long, allow_negative_numbers = true)]
    pub slack: Option<i64>,
    /// Number of moments to report
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub top: Option<i64>,
}

impl AnalysisArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if let Some(policy) = self.policy {
            config.window_policy = policy;
        }
        if let Some(threshold) = self.threshold {
            config.ignore_threshold = threshold;
        }
        if let Some(slack) = self.slack {
            config.slack = slack;
        }
        if let Some(top) = self.top {
            config.top_n = top;
        }
    }
}
