//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockscope")]
#[command(author, version, about = "Technical indicator and signal analysis for daily stock bars")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/stockscope.toml")]
    pub config: PathBuf,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify every indicator for a symbol
    Analyze(AnalyzeArgs),
    /// Show recent indicator values and crossover events
    Trend(TrendArgs),
    /// Export daily bars with day-over-day change to CSV
    Export(ExportArgs),
    /// Show the latest order-book snapshot for a symbol
    Quote(QuoteArgs),
    /// List the indicators and their signal rules
    Indicators,
    /// Validate configuration
    ValidateConfig,
}

/// Symbol and date range shared by the data commands.
#[derive(clap::Args)]
pub struct RangeArgs {
    /// Stock symbol
    pub symbol: String,

    /// Start date (YYYY-MM-DD); defaults to a year before the end date
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Directory of CSV files (overrides the config file)
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct TrendArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Number of trailing bars to show
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Output directory (overrides the config file)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct QuoteArgs {
    /// Stock symbol
    pub symbol: String,

    /// Directory of quote snapshots (overrides the config file)
    #[arg(long)]
    pub quotes: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}
