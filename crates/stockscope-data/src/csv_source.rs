//! CSV data source.
//!
//! One file per symbol, `{dir}/{symbol}.csv`, with a header row. Column
//! names are matched case-insensitively through aliases.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use stockscope_core::error::DataError;
use stockscope_core::traits::DataSource;
use stockscope_core::types::Bar;
use tracing::debug;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "DATE", alias = "trade_date")]
    date: String,
    #[serde(alias = "Open", alias = "OPEN")]
    open: f64,
    #[serde(alias = "High", alias = "HIGH")]
    high: f64,
    #[serde(alias = "Low", alias = "LOW")]
    low: f64,
    #[serde(alias = "Close", alias = "CLOSE", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "VOLUME", alias = "vol", default)]
    volume: f64,
}

/// Daily bars read from per-symbol CSV files.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    dir: PathBuf,
}

impl CsvDataSource {
    /// Create a source over a directory of CSV files.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DataError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data directory {} does not exist", dir.display()),
            )));
        }
        Ok(Self { dir })
    }

    /// Path of the file holding `symbol`.
    pub fn path_for(&self, symbol: &str) -> Result<PathBuf, DataError> {
        symbol_path(&self.dir, symbol, "csv")
    }

    /// Parse every record of a CSV document, oldest first.
    ///
    /// Rejects duplicate dates; bars are sorted but otherwise left as read.
    pub fn parse(content: &[u8]) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let mut bars = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let date = parse_date(&record.date)?;

            if !record.volume.is_finite() || record.volume < 0.0 {
                return Err(DataError::InvalidBar {
                    date,
                    reason: format!("invalid volume {}", record.volume),
                });
            }

            bars.push(Bar::new(
                date,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume.round() as u64,
            ));
        }

        // Sort by date
        bars.sort_by_key(|b| b.date);

        if let Some(pair) = bars.windows(2).find(|pair| pair[0].date == pair[1].date) {
            return Err(DataError::DuplicateDate(pair[1].date));
        }

        Ok(bars)
    }

    async fn load(&self, path: &Path) -> Result<Vec<Bar>, DataError> {
        let content = tokio::fs::read(path).await?;
        Self::parse(&content)
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn daily_bars(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol)?;
        if !path.exists() {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        let bars: Vec<Bar> = self
            .load(&path)
            .await?
            .into_iter()
            .filter(|b| b.date >= start && b.date <= end)
            .collect();

        debug!(
            symbol,
            %start,
            %end,
            bars = bars.len(),
            path = %path.display(),
            "Loaded CSV bars"
        );
        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// `{dir}/{symbol}.{extension}`, for symbols that are plain file stems.
///
/// Separators, `..` and leading dots are rejected so lookups stay inside
/// `dir`.
pub(crate) fn symbol_path(
    dir: &Path,
    symbol: &str,
    extension: &str,
) -> Result<PathBuf, DataError> {
    let plain = !symbol.is_empty()
        && !symbol.starts_with('.')
        && !symbol.contains("..")
        && !symbol.contains(['/', '\\', ':', '\0']);
    if !plain {
        return Err(DataError::InvalidSymbol(symbol.to_string()));
    }
    Ok(dir.join(format!("{}.{}", symbol, extension)))
}

/// Parse the date formats found in exported daily data.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    // Timestamps at midnight, as some exports write them
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.date());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Date,Open,High,Low,Close,Volume
2024-01-04,10.2,10.6,10.1,10.5,1200
2024-01-02,10.0,10.3,9.9,10.1,1000
2024-01-03,10.1,10.4,10.0,10.2,1100
";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stockscope-csv-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("2024/01/15").unwrap(), expected);
        assert_eq!(parse_date("20240115").unwrap(), expected);
        assert_eq!(parse_date("2024-01-15 00:00:00").unwrap(), expected);
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_parse_sorts_by_date() {
        let bars = CsvDataSource::parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[2].volume, 1200);
    }

    #[test]
    fn test_parse_lowercase_headers() {
        let content = "date,open,high,low,close,volume\n2024-01-02,1,2,0.5,1.5,10\n";
        let bars = CsvDataSource::parse(content.as_bytes()).unwrap();

        assert!((bars[0].close - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        let content = format!("{}2024-01-03,10.1,10.4,10.0,10.2,1100\n", SAMPLE);

        assert!(matches!(
            CsvDataSource::parse(content.as_bytes()),
            Err(DataError::DuplicateDate(_))
        ));
    }

    #[tokio::test]
    async fn test_daily_bars_filters_range() {
        let dir = temp_dir("range");
        std::fs::write(dir.join("600000.csv"), SAMPLE).unwrap();
        let source = CsvDataSource::new(&dir).unwrap();

        let start = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
        let bars = source.daily_bars("600000", start, end).await.unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, start);
        assert_eq!(bars[1].date, end);
    }

    #[test]
    fn test_path_for_rejects_escapes() {
        let source = CsvDataSource::new(temp_dir("paths")).unwrap();

        assert!(source.path_for("600519").unwrap().ends_with("600519.csv"));
        assert!(source.path_for("BRK.B").is_ok());
        for symbol in ["", "../secret", "..", "a/b", "a\\b", ".hidden", "C:x"] {
            assert!(
                matches!(source.path_for(symbol), Err(DataError::InvalidSymbol(_))),
                "{} accepted",
                symbol
            );
        }
    }

    #[tokio::test]
    async fn test_traversal_symbol_is_not_read() {
        let dir = temp_dir("traversal");
        let data = dir.join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(dir.join("outside.csv"), SAMPLE).unwrap();
        let source = CsvDataSource::new(&data).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        assert!(matches!(
            source.daily_bars("../outside", day, day).await,
            Err(DataError::InvalidSymbol(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_symbol() {
        let dir = temp_dir("missing");
        let source = CsvDataSource::new(&dir).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

        assert!(matches!(
            source.daily_bars("999999", day, day).await,
            Err(DataError::SymbolNotFound(_))
        ));
    }
}
