//! Volume-based indicators.

use stockscope_core::traits::OhlcvIndicator;
use stockscope_core::types::Bar;

use crate::rolling::{column, rolling_sum, zip_with};

/// Chaikin Money Flow.
///
/// Money-flow volume summed over `period` bars, divided by total volume.
/// Bars with no range contribute zero flow.
#[derive(Debug, Clone)]
pub struct ChaikinMoneyFlow {
    period: usize,
}

impl ChaikinMoneyFlow {
    /// Create a CMF; 14 is the default lookback here.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Money-flow multiplier in [-1, 1].
    fn multiplier(bar: &Bar) -> f64 {
        let range = bar.range();
        if range == 0.0 {
            return 0.0;
        }
        ((bar.close - bar.low) - (bar.high - bar.close)) / range
    }
}

impl Default for ChaikinMoneyFlow {
    fn default() -> Self {
        Self::new(14)
    }
}

impl OhlcvIndicator for ChaikinMoneyFlow {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let flow = column(bars, |b| Self::multiplier(b) * b.volume as f64);
        let volume = column(bars, |b| b.volume as f64);

        zip_with(
            &rolling_sum(&flow, self.period),
            &rolling_sum(&volume, self.period),
            |flow, volume| (volume > 0.0).then(|| flow / volume),
        )
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "CMF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars(rows: &[(f64, f64, f64, u64)]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close, volume))| {
                Bar::new(start + Duration::days(i as i64), close, high, low, close, volume)
            })
            .collect()
    }

    #[test]
    fn test_cmf_closes_at_high() {
        let cmf = ChaikinMoneyFlow::new(2);
        let data = bars(&[(10.0, 8.0, 10.0, 100), (11.0, 9.0, 11.0, 300)]);

        assert!((cmf.latest(&data).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cmf_weighted_by_volume() {
        let cmf = ChaikinMoneyFlow::new(2);
        // +1 on 100 shares, -1 on 300 shares
        let data = bars(&[(10.0, 8.0, 10.0, 100), (11.0, 9.0, 9.0, 300)]);

        assert!((cmf.latest(&data).unwrap() + 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_cmf_flat_bar_contributes_nothing() {
        let cmf = ChaikinMoneyFlow::new(2);
        let data = bars(&[(10.0, 10.0, 10.0, 100), (11.0, 9.0, 11.0, 100)]);

        assert!((cmf.latest(&data).unwrap() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_cmf_zero_volume_is_undefined() {
        let cmf = ChaikinMoneyFlow::new(2);
        let data = bars(&[(10.0, 8.0, 9.0, 0), (11.0, 9.0, 10.0, 0)]);

        assert_eq!(cmf.latest(&data), None);
    }
}
