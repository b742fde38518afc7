//! Indicator trait definitions.
//!
//! Every indicator produces one output slot per input point, aligned by
//! index. `None` marks points without enough history (or with a degenerate
//! denominator); it is never replaced by zero.

use crate::error::IndicatorError;
use crate::types::Bar;

/// Indicator over a single numeric series (typically closes).
pub trait Indicator: Send + Sync {
    /// Calculate indicator values, one per input point.
    ///
    /// # Arguments
    /// * `data` - Input values, oldest first
    ///
    /// # Returns
    /// A vector with the same length as `data`
    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>>;

    /// Minimum number of points before the first defined value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value at the last input point.
    fn latest(&self, data: &[f64]) -> Option<f64> {
        self.calculate(data).last().copied().flatten()
    }

    /// Validate that there's enough data.
    fn validate_data(&self, data: &[f64]) -> Result<(), IndicatorError> {
        if data.len() < self.period() {
            return Err(IndicatorError::InsufficientData {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

/// Indicator that uses full bars (high, low, volume), possibly with
/// several output lines per bar.
pub trait OhlcvIndicator: Send + Sync {
    /// Per-bar output (a scalar or a struct of aligned lines).
    type Output: Copy;

    /// Calculate indicator values, one per bar.
    fn calculate(&self, bars: &[Bar]) -> Vec<Option<Self::Output>>;

    /// Minimum number of bars before the first defined value.
    fn min_bars(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Value at the last bar.
    fn latest(&self, bars: &[Bar]) -> Option<Self::Output> {
        self.calculate(bars).last().copied().flatten()
    }

    /// Validate that there's enough data.
    fn validate_data(&self, bars: &[Bar]) -> Result<(), IndicatorError> {
        if bars.len() < self.min_bars() {
            return Err(IndicatorError::InsufficientData {
                required: self.min_bars(),
                available: bars.len(),
            });
        }
        Ok(())
    }
}
