//! Listing of every classified indicator and its rule.

use serde::Serialize;

use crate::analysis::{Analyzer, MOVING_AVERAGES, OSCILLATORS};
use crate::classifier::ThresholdRule;

/// Information about one classified indicator.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    /// Group the reading is tallied in
    pub group: &'static str,
    /// Name with parameters, as it appears in reports
    pub name: String,
    pub rule: ThresholdRule,
    /// Rule in words
    pub description: String,
}

/// Every indicator the analyzer reports, in report order.
pub fn catalog(analyzer: &Analyzer) -> Vec<CatalogEntry> {
    // Names and rules do not depend on the data
    let oscillators = analyzer
        .oscillator_readings(&[])
        .into_iter()
        .map(|r| (OSCILLATORS, r));
    let moving_averages = analyzer
        .moving_average_readings(&[])
        .into_iter()
        .map(|r| (MOVING_AVERAGES, r));

    oscillators
        .chain(moving_averages)
        .map(|(group, reading)| CatalogEntry {
            group,
            description: reading.rule.describe(),
            name: reading.name,
            rule: reading.rule,
        })
        .collect()
}
