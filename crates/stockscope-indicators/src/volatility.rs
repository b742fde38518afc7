//! Volatility indicators.

use statrs::statistics::Statistics;
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::Bar;

use crate::rolling::{defined, rolling_apply, zip_with};

/// Rolling sample standard deviation (n - 1 denominator).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }

    /// Rolling `(mean, std_dev)` pairs.
    pub fn mean_and_deviation(
        &self,
        values: &[Option<f64>],
    ) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
        let means = rolling_apply(values, self.period, |window| Some(window.iter().mean()));
        let deviations = rolling_apply(values, self.period, |window| {
            Some(window.iter().std_dev())
        });
        (means, deviations)
    }
}

impl Indicator for StdDev {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        self.mean_and_deviation(&defined(data)).1
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger %B: where the close sits between the bands.
///
/// Bands are `SMA(close) +/- multiplier * std_dev(close)`. 0 is the lower
/// band and 1 the upper; a band of zero width is undefined.
#[derive(Debug, Clone)]
pub struct BollingerPercentB {
    std_dev: StdDev,
    period: usize,
    multiplier: f64,
}

impl BollingerPercentB {
    /// Create with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create with custom parameters.
    pub fn with_params(period: usize, multiplier: f64) -> Self {
        assert!(multiplier > 0.0, "Std dev multiplier must be positive");
        Self {
            std_dev: StdDev::new(period),
            period,
            multiplier,
        }
    }

    /// Calculate from close prices.
    pub fn calculate_closes(&self, closes: &[f64]) -> Vec<Option<f64>> {
        let closes = defined(closes);
        let (means, deviations) = self.std_dev.mean_and_deviation(&closes);
        let lower = zip_with(&means, &deviations, |mean, sd| Some(mean - self.multiplier * sd));

        (0..closes.len())
            .map(|i| match (closes[i], lower[i], deviations[i]) {
                (Some(close), Some(lower), Some(sd)) => {
                    let width = 2.0 * self.multiplier * sd;
                    (width > 0.0).then(|| (close - lower) / width)
                }
                _ => None,
            })
            .collect()
    }
}

impl Default for BollingerPercentB {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for BollingerPercentB {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate_closes(&closes)
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger %B"
    }
}
