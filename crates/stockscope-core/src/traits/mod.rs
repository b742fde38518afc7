//! Core traits.

mod data_source;
mod indicator;

pub use data_source::{DataSource, Quote, QuoteLevel, QuoteSource, SymbolDirectory};
pub use indicator::{Indicator, OhlcvIndicator};
