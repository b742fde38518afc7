//! Order-book snapshots stored as JSON files.
//!
//! One file per symbol, `{dir}/{symbol}.json`:
//!
//! ```json
//! {
//!   "timestamp": "2024-06-28T14:30:00",
//!   "last": 150.0, "open": 148.0, "high": 151.0, "low": 147.5, "volume": 12000,
//!   "bids": [{ "price": 149.95, "volume": 100 }],
//!   "asks": [{ "price": 150.05, "volume": 200 }]
//! }
//! ```
//!
//! Every field is optional. A snapshot without a timestamp is stamped with
//! the time it was read.

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use std::path::PathBuf;
use stockscope_core::error::DataError;
use stockscope_core::traits::{Quote, QuoteLevel, QuoteSource};
use tracing::debug;

use crate::csv_source::symbol_path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteRecord {
    timestamp: Option<NaiveDateTime>,
    last: Option<f64>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    volume: Option<u64>,
    bids: Vec<QuoteLevel>,
    asks: Vec<QuoteLevel>,
}

/// Quotes read from per-symbol JSON snapshot files.
#[derive(Debug, Clone)]
pub struct JsonQuoteSource {
    dir: PathBuf,
}

impl JsonQuoteSource {
    /// A missing directory is treated as holding no snapshots.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Parse and validate one snapshot document.
    pub fn parse(symbol: &str, content: &[u8], read_at: NaiveDateTime) -> Result<Quote, DataError> {
        let record: QuoteRecord =
            serde_json::from_slice(content).map_err(|e| DataError::ParseError(e.to_string()))?;

        let quote = Quote {
            symbol: symbol.to_string(),
            timestamp: record.timestamp.unwrap_or(read_at),
            last: record.last,
            open: record.open,
            high: record.high,
            low: record.low,
            volume: record.volume,
            bids: record.bids,
            asks: record.asks,
        };
        quote.validate()?;
        Ok(quote)
    }
}

#[async_trait]
impl QuoteSource for JsonQuoteSource {
    async fn latest_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError> {
        let path = symbol_path(&self.dir, symbol, "json")?;
        if !path.exists() {
            debug!(symbol, path = %path.display(), "No quote snapshot");
            return Ok(None);
        }

        let content = tokio::fs::read(&path).await?;
        Self::parse(symbol, &content, Local::now().naive_local()).map(Some)
    }

    fn name(&self) -> &str {
        "json-quotes"
    }
}
