//! Stock identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Display name used when a symbol cannot be resolved.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Identity and latest quote of the analyzed stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockInfo {
    /// Symbol code
    pub symbol: String,
    /// Display name, or `UNKNOWN_NAME`
    pub name: String,
    /// Close of the most recent bar
    pub latest_close: f64,
    /// Date of the most recent bar
    pub latest_date: NaiveDate,
}
