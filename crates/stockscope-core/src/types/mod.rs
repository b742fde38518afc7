//! Core data types.

mod ohlcv;
mod signal;
mod stock;

pub use ohlcv::{Bar, BarSeries};
pub use signal::{Signal, SignalTally};
pub use stock::{StockInfo, UNKNOWN_NAME};
