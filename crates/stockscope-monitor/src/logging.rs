//! Logging setup.

use serde::{Deserialize, Serialize};
use std::fmt as std_fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnknownFormat(other.to_string())),
        }
    }
}

impl std_fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std_fmt::Formatter<'_>) -> std_fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Compact => write!(f, "compact"),
            Self::Json => write!(f, "json"),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unknown log format: {0}")]
    UnknownFormat(String),

    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Logging already initialized: {0}")]
    Init(String),
}

/// Build the filter; `RUST_LOG` wins over `level` when set.
fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level).map_err(|e| LoggingError::Filter(e.to_string())),
    }
}

/// Install the global subscriber. Logs go to stderr so report output on
/// stdout stays machine-readable.
pub fn setup_logging(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let filter = build_filter(level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| LoggingError::Init(e.to_string()))?;
    tracing::debug!(%format, "Logging initialized");
    Ok(())
}
