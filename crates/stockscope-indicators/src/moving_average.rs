//! Moving average indicators.

use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::Bar;

use crate::rolling::{
    column, defined, ewm, mask_head, rolling_apply, rolling_max, rolling_mean, rolling_min,
    rolling_sum, span_alpha, zip_with,
};

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the last N values.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        rolling_mean(&defined(data), self.period)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Exponential Moving Average (EMA).
///
/// Recursive weighting with `alpha = 2 / (period + 1)`, seeded with the
/// first value. Points before `period` values have been seen are undefined.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
}

impl Ema {
    /// Create a new EMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            multiplier: span_alpha(period),
        }
    }

    /// The unmasked recursion, defined from the first point.
    pub fn smooth(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        ewm(values, self.multiplier)
    }
}

impl Indicator for Ema {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        mask_head(self.smooth(&defined(data)), self.period - 1)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "EMA"
    }
}

/// Weighted Moving Average (WMA).
///
/// Gives linearly decreasing weights to older values.
#[derive(Debug, Clone)]
pub struct Wma {
    period: usize,
    weights_sum: f64,
}

impl Wma {
    /// Create a new WMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        // Sum of weights: 1 + 2 + ... + n = n(n+1)/2
        let weights_sum = (period * (period + 1)) as f64 / 2.0;
        Self {
            period,
            weights_sum,
        }
    }

    /// WMA over a series that may contain undefined points.
    pub fn smooth(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        rolling_apply(values, self.period, |window| {
            let weighted_sum: f64 = window
                .iter()
                .enumerate()
                .map(|(i, &value)| value * (i + 1) as f64)
                .sum();
            Some(weighted_sum / self.weights_sum)
        })
    }
}

impl Indicator for Wma {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        self.smooth(&defined(data))
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "WMA"
    }
}

/// Hull Moving Average.
///
/// `WMA(2 * WMA(n / 2) - WMA(n), sqrt(n))`.
#[derive(Debug, Clone)]
pub struct HullMa {
    period: usize,
    half: Wma,
    full: Wma,
    outer: Wma,
    outer_period: usize,
}

impl HullMa {
    /// Create a Hull MA; the period must be at least 2.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        let outer_period = ((period as f64).sqrt() as usize).max(1);
        Self {
            period,
            half: Wma::new(period / 2),
            full: Wma::new(period),
            outer: Wma::new(outer_period),
            outer_period,
        }
    }
}

impl Indicator for HullMa {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let values = defined(data);
        let half = self.half.smooth(&values);
        let full = self.full.smooth(&values);
        let raw = zip_with(&half, &full, |h, f| Some(2.0 * h - f));
        self.outer.smooth(&raw)
    }

    fn period(&self) -> usize {
        self.period + self.outer_period - 1
    }

    fn name(&self) -> &str {
        "HMA"
    }
}

/// Volume-Weighted Moving Average.
///
/// Undefined where the window's total volume is zero.
#[derive(Debug, Clone)]
pub struct Vwma {
    period: usize,
}

impl Vwma {
    /// Create a VWMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl OhlcvIndicator for Vwma {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let weighted = column(bars, |b| b.close * b.volume as f64);
        let volumes = column(bars, |b| b.volume as f64);

        zip_with(
            &rolling_sum(&weighted, self.period),
            &rolling_sum(&volumes, self.period),
            |pv, v| (v > 0.0).then(|| pv / v),
        )
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "VWMA"
    }
}

/// Ichimoku base line (Kijun-sen): midpoint of the period's high/low range.
#[derive(Debug, Clone)]
pub struct IchimokuBaseLine {
    period: usize,
}

impl IchimokuBaseLine {
    /// Create a base line; 26 is the conventional period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for IchimokuBaseLine {
    fn default() -> Self {
        Self::new(26)
    }
}

impl OhlcvIndicator for IchimokuBaseLine {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let highs = column(bars, |b| b.high);
        let lows = column(bars, |b| b.low);

        zip_with(
            &rolling_max(&highs, self.period),
            &rolling_min(&lows, self.period),
            |hh, ll| Some((hh + ll) / 2.0),
        )
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Ichimoku Base Line"
    }
}
