//! Error types for the analysis system.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a whole analysis.
///
/// Everything recoverable (short history, degenerate denominators, unknown
/// display names) is reported as data instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No data for symbol {symbol}")]
    EmptySeries { symbol: String },

    #[error("Invalid series: {0}")]
    InvalidSeries(#[from] DataError),

    #[error("Invalid parameters: {0}")]
    Indicator(#[from] IndicatorError),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Bars out of order: {current} follows {previous}")]
    Unordered {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Duplicate bar for {0}")]
    DuplicateDate(NaiveDate),

    #[error("Invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },

    #[error("Invalid quote for {symbol}: {reason}")]
    InvalidQuote { symbol: String, reason: String },

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Data source error: {0}")]
    Internal(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} bars, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
