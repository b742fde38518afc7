//! Retrying wrapper around a data source.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use stockscope_core::error::DataError;
use stockscope_core::traits::DataSource;
use stockscope_core::types::Bar;
use tracing::{info, warn};

/// Retries failed or empty fetches with a fixed delay.
///
/// Errors that cannot improve on retry (unknown symbol, malformed data) are
/// returned at once.
pub struct RetryingSource<S> {
    inner: S,
    attempts: u32,
    delay: Duration,
}

impl<S: DataSource> RetryingSource<S> {
    /// Wrap `inner`; `attempts` counts the first try and is at least 1.
    pub fn new(inner: S, attempts: u32, delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn is_retryable(error: &DataError) -> bool {
        matches!(
            error,
            DataError::Io(_) | DataError::Internal(_) | DataError::NoDataAvailable
        )
    }
}

#[async_trait]
impl<S: DataSource> DataSource for RetryingSource<S> {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let mut last_error: Option<String> = None;

        for attempt in 1..=self.attempts {
            match self.inner.daily_bars(symbol, start, end).await {
                Ok(bars) if !bars.is_empty() => {
                    info!(symbol, bars = bars.len(), attempt, "Fetched daily bars");
                    return Ok(bars);
                }
                Ok(_) => {
                    warn!(
                        symbol,
                        attempt,
                        attempts = self.attempts,
                        "Data source returned no bars"
                    );
                    last_error = None;
                }
                Err(e) if Self::is_retryable(&e) => {
                    warn!(
                        symbol,
                        attempt,
                        attempts = self.attempts,
                        error = %e,
                        "Fetch failed"
                    );
                    last_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.delay).await;
            }
        }

        match last_error {
            Some(last_error) => Err(DataError::RetriesExhausted {
                attempts: self.attempts,
                last_error,
            }),
            None => Err(DataError::NoDataAvailable),
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
