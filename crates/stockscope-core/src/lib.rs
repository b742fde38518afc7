//! Core types and traits for stock indicator analysis.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, BarSeries)
//! - Signal classes and tallies
//! - Stock identity
//! - Core traits for indicators, data sources and symbol directories

pub mod error;
pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
