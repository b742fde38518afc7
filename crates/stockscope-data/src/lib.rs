//! Market data sources, quote snapshots and CSV export.

mod csv_source;
mod directory;
mod export;
mod fallback;
mod quote_source;
mod retry;

pub use csv_source::CsvDataSource;
pub use directory::{resolve_display_name, StaticDirectory};
pub use export::{export_csv, export_file_name, export_rows, to_csv, ExportRow};
pub use fallback::{FallbackSource, QuoteBarSource};
pub use quote_source::JsonQuoteSource;
pub use retry::RetryingSource;

use chrono::{Duration, NaiveDate};
use stockscope_core::error::DataError;
use stockscope_core::traits::DataSource;
use stockscope_core::types::BarSeries;
use tracing::warn;

/// Days of history fetched when no start date is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;

/// Default inclusive date range ending at `today`.
pub fn default_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(DEFAULT_LOOKBACK_DAYS), today)
}

/// Fetch and validate a symbol's daily bars.
///
/// An empty result is not an error here; callers decide what an empty
/// series means.
pub async fn load_series(
    source: &dyn DataSource,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BarSeries, DataError> {
    if start > end {
        return Err(DataError::Internal(format!(
            "start date {} is after end date {}",
            start, end
        )));
    }

    let bars = match source.daily_bars(symbol, start, end).await {
        Ok(bars) => bars,
        Err(DataError::NoDataAvailable) => {
            warn!(symbol, source = source.name(), %start, %end, "No bars in range");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    BarSeries::new(symbol, bars)
}
