//! Daily OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// One trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Trading date
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: u64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Typical price (HLC average).
    #[inline]
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Median price (HL average).
    #[inline]
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// The bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// True range against the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.high - self.low;
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.high - self.low,
        }
    }

    /// Check prices are positive and high/low enclose open and close.
    pub fn validate(&self) -> Result<(), DataError> {
        let invalid = |reason: &str| DataError::InvalidBar {
            date: self.date,
            reason: reason.to_string(),
        };

        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(invalid("prices must be positive and finite"));
        }
        if self.high < self.open.max(self.close).max(self.low) {
            return Err(invalid("high is below open, close or low"));
        }
        if self.low > self.open.min(self.close).min(self.high) {
            return Err(invalid("low is above open, close or high"));
        }
        Ok(())
    }
}

/// Ascending, duplicate-free sequence of daily bars for one symbol.
///
/// Ordering is checked on construction and never repaired: analysis code
/// relies on index order being date order.
#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    /// Symbol identifier
    pub symbol: String,
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, rejecting invalid bars and unordered or duplicate dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, DataError> {
        for bar in &bars {
            bar.validate()?;
        }
        for pair in bars.windows(2) {
            let (previous, current) = (pair[0].date, pair[1].date);
            if current == previous {
                return Err(DataError::DuplicateDate(current));
            }
            if current < previous {
                return Err(DataError::Unordered { previous, current });
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars,
        })
    }

    /// Number of bars.
    #[inline]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if the series is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// All bars, oldest first.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// The most recent bar.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

}
