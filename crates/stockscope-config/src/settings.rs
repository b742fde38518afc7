//! Configuration structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use stockscope_monitor::LogFormat;
use stockscope_signals::{AnalysisParams, TrendSettings};

/// Main application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub analysis: AnalysisParams,
    #[serde(default)]
    pub trend: TrendSettings,
    #[serde(default)]
    pub data: DataSettings,
    /// Symbol code to display name
    #[serde(default)]
    pub symbols: HashMap<String, String>,
}

/// General app settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockscope".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Market data settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory of `{symbol}.csv` files
    pub dir: PathBuf,
    /// Fetch attempts per request, first try included
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
    /// Where `export` writes its files
    pub output_dir: PathBuf,
    /// Directory of `{symbol}.json` order-book snapshots
    pub quote_dir: PathBuf,
    /// Use the snapshot's session bar when the history is empty
    pub fallback_to_quotes: bool,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            retry_attempts: 3,
            retry_delay_ms: 500,
            output_dir: PathBuf::from("exports"),
            quote_dir: PathBuf::from("quotes"),
            fallback_to_quotes: true,
        }
    }
}
