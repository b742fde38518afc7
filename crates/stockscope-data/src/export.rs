//! CSV export of daily bars with day-over-day change.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use stockscope_core::error::DataError;
use stockscope_core::types::Bar;
use tracing::info;

/// One exported row; prices and change are rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    /// Percent change of the close from the previous bar; 0 on the first
    pub change_pct: Decimal,
}

fn round2(value: f64) -> Result<Decimal, DataError> {
    let mut rounded = Decimal::from_f64_retain(value)
        .ok_or_else(|| DataError::ParseError(format!("{} is not representable", value)))?
        .round_dp(2);
    rounded.rescale(2);
    Ok(rounded)
}

/// Build export rows from bars ordered oldest first.
pub fn export_rows(bars: &[Bar]) -> Result<Vec<ExportRow>, DataError> {
    let mut previous_close: Option<f64> = None;

    bars.iter()
        .map(|bar| {
            let change_pct = match previous_close {
                Some(prev) if prev != 0.0 => (bar.close - prev) / prev * 100.0,
                _ => 0.0,
            };
            previous_close = Some(bar.close);

            Ok(ExportRow {
                date: bar.date.format("%Y-%m-%d").to_string(),
                open: round2(bar.open)?,
                high: round2(bar.high)?,
                low: round2(bar.low)?,
                close: round2(bar.close)?,
                volume: bar.volume,
                change_pct: round2(change_pct)?,
            })
        })
        .collect()
}

/// Serialize rows as CSV with a header line.
pub fn to_csv(rows: &[ExportRow]) -> Result<Vec<u8>, DataError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| DataError::ParseError(e.to_string()))?;
    }
    writer
        .into_inner()
        .map_err(|e| DataError::Internal(e.to_string()))
}

/// File name for an export taken at `timestamp`.
pub fn export_file_name(symbol: &str, timestamp: NaiveDateTime) -> String {
    format!("{}_{}.csv", symbol, timestamp.format("%Y%m%d_%H%M%S"))
}

/// Write `bars` to `{output_dir}/{symbol}_{timestamp}.csv`, creating the
/// directory if needed. Returns the written path.
pub async fn export_csv(
    symbol: &str,
    bars: &[Bar],
    output_dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf, DataError> {
    if bars.is_empty() {
        return Err(DataError::NoDataAvailable);
    }

    let content = to_csv(&export_rows(bars)?)?;

    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(export_file_name(symbol, timestamp));
    tokio::fs::write(&path, content).await?;

    info!(symbol, rows = bars.len(), path = %path.display(), "Exported daily bars");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn bars() -> Vec<Bar> {
        let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
        vec![
            Bar::new(day(1), 10.0, 10.5, 9.8, 10.0, 1000),
            Bar::new(day(2), 10.0, 11.2, 10.0, 11.0, 1500),
            Bar::new(day(3), 11.0, 11.0, 10.1, 10.456, 900),
        ]
    }

    #[test]
    fn test_change_pct() {
        let rows = export_rows(&bars()).unwrap();

        assert_eq!(rows[0].change_pct, dec!(0.00));
        assert_eq!(rows[1].change_pct, dec!(10.00));
        // (10.456 - 11) / 11 = -4.945..%
        assert_eq!(rows[2].change_pct, dec!(-4.95));
        assert_eq!(rows[2].close, dec!(10.46));
    }

    #[test]
    fn test_csv_layout() {
        let csv = String::from_utf8(to_csv(&export_rows(&bars()).unwrap()).unwrap()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next().unwrap(),
            "date,open,high,low,close,volume,change_pct"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-04-01,10.00,10.50,9.80,10.00,1000,0.00"
        );
    }

    #[test]
    fn test_file_name() {
        let ts = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();

        assert_eq!(export_file_name("600519", ts), "600519_20240403_150405.csv");
    }

    #[tokio::test]
    async fn test_export_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("stockscope-export-{}", std::process::id()))
            .join("nested");
        let ts = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let path = export_csv("600519", &bars(), &dir, ts).await.unwrap();

        assert!(path.ends_with("600519_20240403_093000.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
    }

    #[tokio::test]
    async fn test_export_empty_fails() {
        let ts = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert!(matches!(
            export_csv("600519", &[], &std::env::temp_dir(), ts).await,
            Err(DataError::NoDataAvailable)
        ));
    }
}
