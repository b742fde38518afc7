//! Market data collaborator traits.

use crate::error::DataError;
use crate::types::Bar;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One price level of the order book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteLevel {
    pub price: f64,
    pub volume: u64,
}

/// Order-book snapshot with the session's running totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol
    pub symbol: String,
    /// When the snapshot was taken
    pub timestamp: NaiveDateTime,
    /// Latest trade price
    pub last: Option<f64>,
    /// Session open, high and low
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    /// Session volume
    pub volume: Option<u64>,
    /// Bid levels, best (highest) first
    pub bids: Vec<QuoteLevel>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<QuoteLevel>,
}

impl Quote {
    pub fn best_bid(&self) -> Option<QuoteLevel> {
        self.bids.first().copied()
    }

    pub fn best_ask(&self) -> Option<QuoteLevel> {
        self.asks.first().copied()
    }

    /// Get the mid price.
    pub fn mid(&self) -> Option<f64> {
        Some((self.best_bid()?.price + self.best_ask()?.price) / 2.0)
    }

    /// Get the spread.
    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Get the spread as a percentage of the mid price.
    pub fn spread_percent(&self) -> Option<f64> {
        let mid = self.mid()?;
        if mid == 0.0 {
            return None;
        }
        Some(self.spread()? / mid * 100.0)
    }

    /// Check prices are positive and each side is sorted best first.
    pub fn validate(&self) -> Result<(), DataError> {
        let invalid = |reason: &str| DataError::InvalidQuote {
            symbol: self.symbol.clone(),
            reason: reason.to_string(),
        };

        let levels = self.bids.iter().chain(&self.asks);
        let totals = [self.last, self.open, self.high, self.low];
        if levels
            .map(|l| l.price)
            .chain(totals.into_iter().flatten())
            .any(|p| !p.is_finite() || p <= 0.0)
        {
            return Err(invalid("prices must be positive and finite"));
        }
        if self.bids.windows(2).any(|w| w[1].price >= w[0].price) {
            return Err(invalid("bids must be strictly descending"));
        }
        if self.asks.windows(2).any(|w| w[1].price <= w[0].price) {
            return Err(invalid("asks must be strictly ascending"));
        }
        Ok(())
    }

    /// The session so far as a daily bar, if open, high, low and last are known.
    pub fn session_bar(&self) -> Option<Bar> {
        Some(Bar::new(
            self.timestamp.date(),
            self.open?,
            self.high?,
            self.low?,
            self.last?,
            self.volume.unwrap_or(0),
        ))
    }
}

/// Trait for historical daily data providers.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch daily bars.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `start` - First date of the range (inclusive)
    /// * `end` - Last date of the range (inclusive)
    ///
    /// # Returns
    /// Bars ordered from oldest to newest; may be empty
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Trait for order-book snapshot sources.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Get the latest quote; `Ok(None)` when the source has no snapshot.
    async fn latest_quote(&self, symbol: &str) -> Result<Option<Quote>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Resolves symbol codes to display names.
#[async_trait]
pub trait SymbolDirectory: Send + Sync {
    /// Look up the display name; `Ok(None)` when the symbol is not listed.
    async fn display_name(&self, symbol: &str) -> Result<Option<String>, DataError>;
}
