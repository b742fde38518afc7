//! Signal classification and trend detection.
//!
//! This crate turns indicator series into readable verdicts:
//! - Threshold classification of the latest indicator values into
//!   BUY / SELL / NEUTRAL, grouped and tallied
//! - Trailing-window crossover detection (MACD, KDJ, RSI rebound, MA stack)
//! - Text and JSON reports, and a catalog of the rules in use

mod analysis;
mod catalog;
mod classifier;
mod report;
mod trend;

pub use analysis::{AnalysisParams, Analyzer, StockAnalysis, MOVING_AVERAGES, OSCILLATORS};
pub use catalog::{catalog, CatalogEntry};
pub use classifier::{IndicatorGroup, IndicatorResult, ThresholdRule};
pub use report::{trend_table, trend_to_json};
pub use trend::{
    window_snapshots, IndicatorFrame, TrendDetector, TrendFlags, TrendSettings, TrendSnapshot,
    RSI_REBOUND_LEVEL,
};
