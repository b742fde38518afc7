//! CLI command implementations.

pub mod analyze;
pub mod export;
pub mod indicators;
pub mod quote;
pub mod trend;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::time::Duration;
use stockscope_config::AppConfig;
use stockscope_core::types::BarSeries;
use std::path::Path;
use stockscope_core::traits::DataSource;
use stockscope_data::{
    default_range, load_series, CsvDataSource, FallbackSource, JsonQuoteSource, QuoteBarSource,
    RetryingSource,
};
use tracing::info;

use crate::cli::RangeArgs;

/// Resolve the requested range, filling gaps with the default lookback.
fn date_range(args: &RangeArgs, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = args.end.unwrap_or(today);
    let start = args.start.unwrap_or_else(|| default_range(end).0);
    (start, end)
}

/// CSV history with retries, falling back to the quote snapshot's session
/// when enabled.
fn history_source(dir: &Path, config: &AppConfig) -> Result<Box<dyn DataSource>> {
    let csv = CsvDataSource::new(dir)
        .with_context(|| format!("Cannot open data directory {}", dir.display()))?;
    let history = RetryingSource::new(
        csv,
        config.data.retry_attempts,
        Duration::from_millis(config.data.retry_delay_ms),
    );

    if !config.data.fallback_to_quotes {
        return Ok(Box::new(history));
    }
    let quotes = QuoteBarSource::new(JsonQuoteSource::new(&config.data.quote_dir));
    Ok(Box::new(FallbackSource::new(history, quotes)))
}

/// Fetch the bars for a data command.
async fn fetch_series(args: &RangeArgs, config: &AppConfig) -> Result<BarSeries> {
    let dir = args.data.clone().unwrap_or_else(|| config.data.dir.clone());
    let source = history_source(&dir, config)?;

    let (start, end) = date_range(args, Local::now().date_naive());
    info!(symbol = %args.symbol, %start, %end, "Fetching daily bars");

    load_series(source.as_ref(), &args.symbol, start, end)
        .await
        .with_context(|| format!("Failed to load bars for {}", args.symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(start: Option<NaiveDate>, end: Option<NaiveDate>) -> RangeArgs {
        RangeArgs {
            symbol: "600519".to_string(),
            start,
            end,
            data: None,
        }
    }

    #[test]
    fn test_date_range_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();

        let (start, end) = date_range(&args(None, None), today);
        assert_eq!(end, today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        let explicit_end = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let (start, end) = date_range(&args(None, Some(explicit_end)), today);
        assert_eq!(end, explicit_end);
        // 2024 is a leap year
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir =
            std::env::temp_dir().join(format!("stockscope-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(dir.join("data")).unwrap();
        std::fs::create_dir_all(dir.join("quotes")).unwrap();
        // No timestamp: stamped when read, so the session falls on today
        std::fs::write(
            dir.join("quotes/600519.json"),
            r#"{ "last": 1502.0, "open": 1490.0, "high": 1510.0, "low": 1485.0, "volume": 32000 }"#,
        )
        .unwrap();
        dir
    }

    fn config_for(dir: &Path, fallback: bool) -> AppConfig {
        let mut config = AppConfig::default();
        config.data.dir = dir.join("data");
        config.data.quote_dir = dir.join("quotes");
        config.data.fallback_to_quotes = fallback;
        config.data.retry_attempts = 1;
        config
    }

    #[tokio::test]
    async fn test_missing_history_uses_quote_session() {
        let dir = scratch("fallback");
        let series = fetch_series(&args(None, None), &config_for(&dir, true))
            .await
            .unwrap();

        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 1502.0);
        assert_eq!(series.bars()[0].date, Local::now().date_naive());
    }

    #[tokio::test]
    async fn test_fallback_can_be_disabled() {
        let dir = scratch("no-fallback");

        assert!(fetch_series(&args(None, None), &config_for(&dir, false))
            .await
            .is_err());
    }
}
