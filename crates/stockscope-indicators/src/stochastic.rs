//! Range-position oscillators: Stochastic, Stochastic RSI, KDJ, Williams %R.
//!
//! All of them place a value inside its recent high/low range. A window
//! with zero range has no position and is reported undefined.

use serde::{Deserialize, Serialize};
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::Bar;

use crate::momentum::Rsi;
use crate::rolling::{column, ewm, rolling_max, rolling_mean, rolling_min};

/// Position of `value` inside `[lowest, highest]`, scaled to 0..=100.
fn range_position(
    values: &[Option<f64>],
    highest: &[Option<f64>],
    lowest: &[Option<f64>],
) -> Vec<Option<f64>> {
    values
        .iter()
        .zip(highest.iter().zip(lowest))
        .map(|(value, (hh, ll))| match (value, hh, ll) {
            (Some(v), Some(hh), Some(ll)) if hh - ll > 0.0 => Some(100.0 * (v - ll) / (hh - ll)),
            _ => None,
        })
        .collect()
}

/// Stochastic oscillator output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticOutput {
    /// %K (smoothed)
    pub k: f64,
    /// %D (signal); undefined until `d_period` values of %K exist
    pub d: Option<f64>,
}

fn pair_lines(k: Vec<Option<f64>>, d: Vec<Option<f64>>) -> Vec<Option<StochasticOutput>> {
    k.into_iter()
        .zip(d)
        .map(|(k, d)| k.map(|k| StochasticOutput { k, d }))
        .collect()
}

/// Stochastic oscillator.
///
/// Raw %K is the close's position in the `k_period` high/low range, %K its
/// `slowing` mean and %D the `d_period` mean of %K.
#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    slowing: usize,
}

impl Stochastic {
    /// Create a new stochastic oscillator with default parameters (14, 3, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 3, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(k_period: usize, d_period: usize, slowing: usize) -> Self {
        assert!(k_period > 0 && d_period > 0 && slowing > 0);
        Self {
            k_period,
            d_period,
            slowing,
        }
    }
}

impl Default for Stochastic {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for Stochastic {
    type Output = StochasticOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<StochasticOutput>> {
        let raw = range_position(
            &column(bars, |b| b.close),
            &rolling_max(&column(bars, |b| b.high), self.k_period),
            &rolling_min(&column(bars, |b| b.low), self.k_period),
        );
        let k = rolling_mean(&raw, self.slowing);
        let d = rolling_mean(&k, self.d_period);
        pair_lines(k, d)
    }

    fn min_bars(&self) -> usize {
        self.k_period + self.slowing - 1
    }

    fn name(&self) -> &str {
        "Stochastic"
    }
}

/// Stochastic RSI.
///
/// RSI normalized into its `stoch_period` range, then smoothed twice.
#[derive(Debug, Clone)]
pub struct StochasticRsi {
    rsi: Rsi,
    rsi_period: usize,
    stoch_period: usize,
    k_period: usize,
    d_period: usize,
}

impl StochasticRsi {
    /// Create with default parameters (14, 14, 3, 3).
    pub fn new() -> Self {
        Self::with_periods(14, 14, 3, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(
        rsi_period: usize,
        stoch_period: usize,
        k_period: usize,
        d_period: usize,
    ) -> Self {
        assert!(rsi_period > 0 && stoch_period > 0 && k_period > 0 && d_period > 0);
        Self {
            rsi: Rsi::new(rsi_period),
            rsi_period,
            stoch_period,
            k_period,
            d_period,
        }
    }

    /// Calculate from close prices.
    pub fn calculate_closes(&self, closes: &[f64]) -> Vec<Option<StochasticOutput>> {
        let rsi = self.rsi.calculate(closes);
        let normalized = range_position(
            &rsi,
            &rolling_max(&rsi, self.stoch_period),
            &rolling_min(&rsi, self.stoch_period),
        );
        let k = rolling_mean(&normalized, self.k_period);
        let d = rolling_mean(&k, self.d_period);
        pair_lines(k, d)
    }
}

impl Default for StochasticRsi {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for StochasticRsi {
    type Output = StochasticOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<StochasticOutput>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate_closes(&closes)
    }

    fn min_bars(&self) -> usize {
        self.rsi_period + self.stoch_period + self.k_period - 1
    }

    fn name(&self) -> &str {
        "Stochastic RSI"
    }
}

/// KDJ output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KdjOutput {
    pub k: f64,
    pub d: f64,
    /// 3K - 2D
    pub j: f64,
}

/// KDJ indicator.
///
/// RSV over `n` bars, K = exponential smoothing of RSV with factor
/// `1 / k_period`, D = the same over K with `1 / d_period`.
#[derive(Debug, Clone)]
pub struct Kdj {
    n: usize,
    k_period: usize,
    d_period: usize,
}

impl Kdj {
    /// Create with default parameters (9, 3, 3).
    pub fn new() -> Self {
        Self::with_periods(9, 3, 3)
    }

    /// Create with custom periods.
    pub fn with_periods(n: usize, k_period: usize, d_period: usize) -> Self {
        assert!(n > 0 && k_period > 0 && d_period > 0);
        Self {
            n,
            k_period,
            d_period,
        }
    }
}

impl Default for Kdj {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for Kdj {
    type Output = KdjOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<KdjOutput>> {
        let rsv = range_position(
            &column(bars, |b| b.close),
            &rolling_max(&column(bars, |b| b.high), self.n),
            &rolling_min(&column(bars, |b| b.low), self.n),
        );
        let k = ewm(&rsv, 1.0 / self.k_period as f64);
        let d = ewm(&k, 1.0 / self.d_period as f64);

        k.into_iter()
            .zip(d)
            .map(|(k, d)| match (k, d) {
                (Some(k), Some(d)) => Some(KdjOutput {
                    k,
                    d,
                    j: 3.0 * k - 2.0 * d,
                }),
                _ => None,
            })
            .collect()
    }

    fn min_bars(&self) -> usize {
        self.n
    }

    fn name(&self) -> &str {
        "KDJ"
    }
}

/// Williams %R: `-100 * (highest_high - close) / (highest_high - lowest_low)`.
#[derive(Debug, Clone)]
pub struct WilliamsR {
    period: usize,
}

impl WilliamsR {
    /// Create with the specified lookback (10 by default).
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self::new(10)
    }
}

impl OhlcvIndicator for WilliamsR {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        range_position(
            &column(bars, |b| b.close),
            &rolling_max(&column(bars, |b| b.high), self.period),
            &rolling_min(&column(bars, |b| b.low), self.period),
        )
        .into_iter()
        // %R is the same position measured down from the top
        .map(|position| position.map(|p| p - 100.0))
        .collect()
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Williams %R"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn make_bars(rows: &[(f64, f64, f64)]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        rows.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                Bar::new(start + Duration::days(i as i64), close, high, low, close, 1000)
            })
            .collect()
    }

    fn trending(n: usize) -> Vec<Bar> {
        let rows: Vec<(f64, f64, f64)> = (0..n)
            .map(|i| (105.0 + i as f64, 95.0 + i as f64, 100.0 + i as f64))
            .collect();
        make_bars(&rows)
    }

    #[test]
    fn test_stochastic_bounds() {
        let stoch = Stochastic::new();
        let result = stoch.calculate(&trending(30));

        assert!(result[14].is_none());
        assert!(result[15].is_some());
        for output in result.iter().flatten() {
            assert!(output.k >= 0.0 && output.k <= 100.0);
            if let Some(d) = output.d {
                assert!((0.0..=100.0).contains(&d));
            }
        }
    }

    #[test]
    fn test_stochastic_at_high() {
        let stoch = Stochastic::with_periods(5, 3, 1);
        // Close at highs
        let rows: Vec<(f64, f64, f64)> = (0..8)
            .map(|i| (10.0 + i as f64, 5.0 + i as f64, 10.0 + i as f64))
            .collect();
        let output = stoch.latest(&make_bars(&rows)).unwrap();

        assert!((output.k - 100.0).abs() < 1e-10);
        assert!((output.d.unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_stochastic_flat_range_is_undefined() {
        let stoch = Stochastic::with_periods(3, 1, 1);
        let flat = make_bars(&[(10.0, 10.0, 10.0); 5]);

        assert!(stoch.calculate(&flat).iter().all(Option::is_none));
    }

    #[test]
    fn test_williams_r_bounds() {
        let wr = WilliamsR::default();
        let rows: Vec<(f64, f64, f64)> = (0..40)
            .map(|i| {
                let mid = 100.0 + (i as f64 * 0.7).sin() * 8.0;
                (mid + 2.0, mid - 2.0, mid + (i as f64).cos())
            })
            .collect();
        let result = wr.calculate(&make_bars(&rows));

        assert!(result[8].is_none());
        for value in result.iter().flatten() {
            assert!(*value <= 0.0 && *value >= -100.0 - 1e-9);
        }
    }

    #[test]
    fn test_williams_r_close_at_low() {
        let wr = WilliamsR::new(3);
        let bars = make_bars(&[(12.0, 10.0, 11.0), (13.0, 9.0, 12.0), (11.0, 8.0, 8.0)]);

        assert!((wr.latest(&bars).unwrap() + 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_kdj_identity() {
        let kdj = Kdj::new();
        let result = kdj.calculate(&trending(20));

        assert!(result[7].is_none());
        // The first K and D equal the first RSV
        let first = result[8].unwrap();
        assert!((first.k - first.d).abs() < 1e-10);
        for output in result.iter().flatten() {
            assert!((output.j - (3.0 * output.k - 2.0 * output.d)).abs() < 1e-10);
        }
    }

    #[test]
    fn test_stochastic_rsi_window() {
        let stoch_rsi = StochasticRsi::new();
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.45).sin() * 5.0)
            .collect();
        let result = stoch_rsi.calculate_closes(&closes);

        // RSI from bar 14, range from bar 27, %K from bar 29
        assert!(result[29 - 1].is_none());
        assert!(result[29].is_some());
        for output in result.iter().flatten() {
            assert!(output.k >= 0.0 && output.k <= 100.0);
        }
    }
}
