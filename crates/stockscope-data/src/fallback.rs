//! Secondary providers used when the primary history fetch comes back empty.

use async_trait::async_trait;
use chrono::NaiveDate;
use stockscope_core::error::DataError;
use stockscope_core::traits::{DataSource, QuoteSource};
use stockscope_core::types::Bar;
use tracing::{debug, info, warn};

/// Falls back to `secondary` when `primary` returns no bars or fails.
///
/// A malformed symbol is returned at once; no provider can serve it.
pub struct FallbackSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P: DataSource, S: DataSource> FallbackSource<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn secondary(&self) -> &S {
        &self.secondary
    }
}

#[async_trait]
impl<P: DataSource, S: DataSource> DataSource for FallbackSource<P, S> {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let primary_error = match self.primary.daily_bars(symbol, start, end).await {
            Ok(bars) if !bars.is_empty() => return Ok(bars),
            Ok(_) | Err(DataError::NoDataAvailable) => None,
            Err(e @ DataError::InvalidSymbol(_)) => return Err(e),
            Err(e) => Some(e),
        };

        warn!(
            symbol,
            primary = self.primary.name(),
            secondary = self.secondary.name(),
            error = ?primary_error,
            "Primary source has no bars, trying secondary"
        );

        match self.secondary.daily_bars(symbol, start, end).await {
            Ok(bars) if !bars.is_empty() => {
                info!(
                    symbol,
                    bars = bars.len(),
                    source = self.secondary.name(),
                    "Using fallback bars"
                );
                Ok(bars)
            }
            Ok(_) => Err(primary_error.unwrap_or(DataError::NoDataAvailable)),
            Err(e) => {
                warn!(symbol, source = self.secondary.name(), error = %e, "Fallback fetch failed");
                Err(primary_error.unwrap_or(e))
            }
        }
    }

    fn name(&self) -> &str {
        self.primary.name()
    }
}

/// Daily data made from the current session of a quote snapshot.
///
/// Yields at most one bar, dated by the snapshot, and only when that date
/// falls inside the requested range.
pub struct QuoteBarSource<Q> {
    quotes: Q,
}

impl<Q: QuoteSource> QuoteBarSource<Q> {
    pub fn new(quotes: Q) -> Self {
        Self { quotes }
    }
}

#[async_trait]
impl<Q: QuoteSource> DataSource for QuoteBarSource<Q> {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let Some(quote) = self.quotes.latest_quote(symbol).await? else {
            return Ok(Vec::new());
        };

        match quote.session_bar() {
            Some(bar) if bar.date >= start && bar.date <= end => {
                bar.validate()?;
                Ok(vec![bar])
            }
            Some(bar) => {
                debug!(symbol, date = %bar.date, "Quote session outside requested range");
                Ok(Vec::new())
            }
            None => {
                debug!(symbol, "Quote has no session totals");
                Ok(Vec::new())
            }
        }
    }

    fn name(&self) -> &str {
        self.quotes.name()
    }
}
