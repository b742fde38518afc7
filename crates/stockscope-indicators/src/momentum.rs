//! Momentum indicators.

use serde::{Deserialize, Serialize};
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::Bar;

use crate::moving_average::Ema;
use crate::rolling::{
    column, defined, ewm_adjusted, mask_head, rolling_mean, rolling_sum, zip_with, EPSILON,
};

/// Relative Strength Index (RSI).
///
/// Average gain and average loss are exponentially smoothed with
/// `alpha = 1 / period` (center of mass `period - 1`). A zero average loss
/// is replaced by `EPSILON`, so a series of pure gains reads just under 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default), 6, 12 and 24.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let n = data.len();

        // Price changes; the first point has none
        let mut gains = vec![None; n];
        let mut losses = vec![None; n];
        for i in 1..n {
            let change = data[i] - data[i - 1];
            gains[i] = Some(change.max(0.0));
            losses[i] = Some((-change).max(0.0));
        }

        let alpha = 1.0 / self.period as f64;
        let avg_gains = ewm_adjusted(&gains, alpha);
        let avg_losses = ewm_adjusted(&losses, alpha);

        let rsi = zip_with(&avg_gains, &avg_losses, |gain, loss| {
            let loss = if loss == 0.0 { EPSILON } else { loss };
            Some(100.0 - 100.0 / (1.0 + gain / loss))
        });

        // Need `period` changes
        mask_head(rsi, self.period)
    }

    fn period(&self) -> usize {
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdOutput {
    /// DIF: fast EMA - slow EMA
    pub dif: f64,
    /// DEA: EMA of DIF
    pub dea: f64,
    /// Histogram: DIF - DEA
    pub histogram: f64,
}

/// MACD indicator.
///
/// The EMAs run from the first bar. [`Macd::lines`] returns the raw
/// recursion; the indicator reading is reported once `slow + signal` bars
/// exist.
#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast: Ema::new(fast),
            slow: Ema::new(slow),
            signal: Ema::new(signal),
            slow_period: slow,
            signal_period: signal,
        }
    }

    /// DIF, DEA and histogram from the first bar on, without warmup masking.
    pub fn lines(&self, closes: &[f64]) -> Vec<Option<MacdOutput>> {
        let closes = defined(closes);
        let fast = self.fast.smooth(&closes);
        let slow = self.slow.smooth(&closes);
        let dif = zip_with(&fast, &slow, |f, s| Some(f - s));
        let dea = self.signal.smooth(&dif);

        dif.iter()
            .zip(&dea)
            .map(|(dif, dea)| match (dif, dea) {
                (Some(dif), Some(dea)) => Some(MacdOutput {
                    dif: *dif,
                    dea: *dea,
                    histogram: dif - dea,
                }),
                _ => None,
            })
            .collect()
    }

    /// Calculate from close prices.
    pub fn calculate_closes(&self, closes: &[f64]) -> Vec<Option<MacdOutput>> {
        mask_head(self.lines(closes), self.min_bars() - 1)
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for Macd {
    type Output = MacdOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<MacdOutput>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        self.calculate_closes(&closes)
    }

    fn min_bars(&self) -> usize {
        self.slow_period + self.signal_period
    }

    fn name(&self) -> &str {
        "MACD"
    }
}

/// Awesome Oscillator: SMA(median, fast) - SMA(median, slow).
#[derive(Debug, Clone)]
pub struct AwesomeOscillator {
    fast: usize,
    slow: usize,
}

impl AwesomeOscillator {
    /// Create with the conventional 5/34 periods.
    pub fn new() -> Self {
        Self::with_periods(5, 34)
    }

    /// Create with custom periods.
    pub fn with_periods(fast: usize, slow: usize) -> Self {
        assert!(fast > 0 && fast < slow, "Fast period must be positive and below slow");
        Self { fast, slow }
    }
}

impl Default for AwesomeOscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for AwesomeOscillator {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let median = column(bars, Bar::median_price);
        zip_with(
            &rolling_mean(&median, self.fast),
            &rolling_mean(&median, self.slow),
            |fast, slow| Some(fast - slow),
        )
    }

    fn min_bars(&self) -> usize {
        self.slow
    }

    fn name(&self) -> &str {
        "AO"
    }
}

/// Ultimate Oscillator.
///
/// Buying pressure `close - min(low, prev_close)` over true range, averaged
/// across three horizons with weights 4:2:1.
#[derive(Debug, Clone)]
pub struct UltimateOscillator {
    short: usize,
    mid: usize,
    long: usize,
}

impl UltimateOscillator {
    /// Create with the conventional 7/14/28 periods.
    pub fn new() -> Self {
        Self::with_periods(7, 14, 28)
    }

    /// Create with custom periods.
    pub fn with_periods(short: usize, mid: usize, long: usize) -> Self {
        assert!(short > 0 && short <= mid && mid <= long);
        Self { short, mid, long }
    }
}

impl Default for UltimateOscillator {
    fn default() -> Self {
        Self::new()
    }
}

impl OhlcvIndicator for UltimateOscillator {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let n = bars.len();
        let mut pressure = vec![None; n];
        let mut true_range = vec![None; n];
        for i in 1..n {
            let prev_close = bars[i - 1].close;
            pressure[i] = Some(bars[i].close - bars[i].low.min(prev_close));
            true_range[i] = Some(bars[i].true_range(Some(prev_close)));
        }

        let average = |period: usize| {
            zip_with(
                &rolling_sum(&pressure, period),
                &rolling_sum(&true_range, period),
                |bp, tr| (tr > 0.0).then(|| bp / tr),
            )
        };
        let short = average(self.short);
        let mid = average(self.mid);
        let long = average(self.long);

        (0..n)
            .map(|i| match (short[i], mid[i], long[i]) {
                (Some(s), Some(m), Some(l)) => Some(100.0 * (4.0 * s + 2.0 * m + l) / 7.0),
                _ => None,
            })
            .collect()
    }

    fn min_bars(&self) -> usize {
        self.long + 1
    }

    fn name(&self) -> &str {
        "UO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                Bar::new(
                    start + Duration::days(i as i64),
                    open,
                    open.max(close) + 1.0,
                    open.min(close) - 1.0,
                    close,
                    1000,
                )
            })
            .collect()
    }

    #[test]
    fn test_rsi_basic() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();

        let result = rsi.calculate(&data);
        assert_eq!(result.len(), 30);
        assert!(result[13].is_none());
        assert!(result[14].is_some());

        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let value = rsi.latest(&data).unwrap();

        // Zero loss is replaced by a tiny epsilon
        assert!(value > 99.99 && value < 100.0);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];

        assert!(rsi.latest(&data).unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..14).map(f64::from).collect();

        assert!(rsi.calculate(&data).iter().all(Option::is_none));
    }

    #[test]
    fn test_macd_uptrend() {
        let macd = Macd::new();
        let bars = bars_from_closes(&(0..50).map(|i| 100.0 + i as f64).collect::<Vec<_>>());
        let result = macd.calculate(&bars);

        assert!(result[33].is_none());
        assert!(result[34].is_some());
        // In an uptrend the fast EMA sits above the slow one
        assert!(result.last().unwrap().unwrap().dif > 0.0);
    }

    #[test]
    fn test_macd_histogram_identity() {
        let macd = Macd::with_periods(5, 10, 3);
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 4.0)
            .collect();

        for output in macd.calculate_closes(&closes).into_iter().flatten() {
            assert_eq!(output.histogram, output.dif - output.dea);
        }
    }

    #[test]
    fn test_macd_lines_start_at_first_bar() {
        let macd = Macd::new();
        let closes = [10.0, 9.8, 9.6, 9.4, 10.8, 11.0];
        let lines = macd.lines(&closes);

        assert!(lines.iter().all(Option::is_some));
        assert_eq!(lines[0].unwrap().dif, 0.0);
        // Both EMAs start at the first close; the fast one reacts first
        assert!(lines[3].unwrap().dif < lines[3].unwrap().dea);
        assert!(lines[4].unwrap().dif > lines[4].unwrap().dea);
        // The indicator reading still waits for slow + signal bars
        assert!(macd.calculate_closes(&closes).iter().all(Option::is_none));
    }

    #[test]
    fn test_awesome_oscillator() {
        let ao = AwesomeOscillator::new();
        let rising = bars_from_closes(&(0..40).map(|i| 50.0 + i as f64).collect::<Vec<_>>());

        assert!(ao.calculate(&rising[..33]).iter().all(Option::is_none));
        assert!(ao.latest(&rising).unwrap() > 0.0);
    }

    #[test]
    fn test_ultimate_oscillator_bounds() {
        let uo = UltimateOscillator::new();
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.4).sin() * 6.0)
            .collect();
        let result = uo.calculate(&bars_from_closes(&closes));

        assert!(result[27].is_none());
        assert!(result[28].is_some());
        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }
}
