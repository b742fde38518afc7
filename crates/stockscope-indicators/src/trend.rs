//! Trend strength and deviation indicators.

use serde::{Deserialize, Serialize};
use stockscope_core::traits::OhlcvIndicator;
use stockscope_core::types::Bar;

use crate::rolling::{column, rolling_apply, rolling_mean, rolling_sum, zip_with, EPSILON};

/// ADX output for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxOutput {
    /// Average directional index
    pub adx: f64,
    /// +DI
    pub plus_di: f64,
    /// -DI
    pub minus_di: f64,
}

/// Average Directional Index.
///
/// Directional movement and true range are summed over `period` bars; ADX
/// is the rolling mean of DX over another `period` bars, so the first value
/// appears at bar `2 * period`.
#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
}

impl Adx {
    /// Create an ADX; 14 is the conventional period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// +DM, -DM and true range per bar; the first bar has none.
    fn directional_movement(bars: &[Bar]) -> [Vec<Option<f64>>; 3] {
        let n = bars.len();
        let mut plus_dm = vec![None; n];
        let mut minus_dm = vec![None; n];
        let mut true_range = vec![None; n];

        for i in 1..n {
            let (prev, cur) = (&bars[i - 1], &bars[i]);
            let up = cur.high - prev.high;
            let down = prev.low - cur.low;

            // Only the larger move counts, and only when positive
            plus_dm[i] = Some(if up > down && up > 0.0 { up } else { 0.0 });
            minus_dm[i] = Some(if down > up && down > 0.0 { down } else { 0.0 });
            true_range[i] = Some(cur.true_range(Some(prev.close)));
        }

        [plus_dm, minus_dm, true_range]
    }
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

impl OhlcvIndicator for Adx {
    type Output = AdxOutput;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<AdxOutput>> {
        let [plus_dm, minus_dm, true_range] = Self::directional_movement(bars);
        let tr_sum = rolling_sum(&true_range, self.period);

        let directional_index = |dm: &[Option<f64>]| {
            zip_with(&rolling_sum(dm, self.period), &tr_sum, |dm, tr| {
                (tr > 0.0).then(|| 100.0 * dm / tr)
            })
        };
        let plus_di = directional_index(&plus_dm);
        let minus_di = directional_index(&minus_dm);

        let dx = zip_with(&plus_di, &minus_di, |p, m| {
            let total = p + m;
            (total > 0.0).then(|| 100.0 * (p - m).abs() / total)
        });
        let adx = rolling_mean(&dx, self.period);

        (0..bars.len())
            .map(|i| match (adx[i], plus_di[i], minus_di[i]) {
                (Some(adx), Some(plus_di), Some(minus_di)) => Some(AdxOutput {
                    adx,
                    plus_di,
                    minus_di,
                }),
                _ => None,
            })
            .collect()
    }

    fn min_bars(&self) -> usize {
        2 * self.period
    }

    fn name(&self) -> &str {
        "ADX"
    }
}

/// Commodity Channel Index.
///
/// `(tp - SMA(tp)) / (0.015 * mean absolute deviation)` over typical price.
#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
}

impl Cci {
    /// Lambert's constant.
    const SCALE: f64 = 0.015;

    /// Create a CCI; 20 is the conventional period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Default for Cci {
    fn default() -> Self {
        Self::new(20)
    }
}

impl OhlcvIndicator for Cci {
    type Output = f64;

    fn calculate(&self, bars: &[Bar]) -> Vec<Option<f64>> {
        let period_f64 = self.period as f64;
        rolling_apply(&column(bars, Bar::typical_price), self.period, |window| {
            let mean = window.iter().sum::<f64>() / period_f64;
            let deviation = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period_f64;
            let deviation = if deviation == 0.0 { EPSILON } else { deviation };
            let current = window[window.len() - 1];
            Some((current - mean) / (Self::SCALE * deviation))
        })
    }

    fn min_bars(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "CCI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn rising(n: usize) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        (0..n)
            .map(|i| {
                let close = 10.0 + i as f64;
                Bar::new(start + Duration::days(i as i64), close, close + 0.01, close, close, 500)
            })
            .collect()
    }

    #[test]
    fn test_adx_warmup() {
        let adx = Adx::default();
        let result = adx.calculate(&rising(40));

        assert!(result[26].is_none());
        assert!(result[27].is_some());
        assert_eq!(adx.min_bars(), 28);
    }

    #[test]
    fn test_adx_one_way_trend() {
        let adx = Adx::new(5);
        let output = adx.latest(&rising(30)).unwrap();

        // No downward movement at all
        assert!(output.minus_di.abs() < 1e-10);
        assert!((output.adx - 100.0).abs() < 1e-9);
        assert!(output.plus_di > 0.0);
    }

    #[test]
    fn test_adx_flat_series_is_undefined() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let flat: Vec<Bar> = (0..20)
            .map(|i| Bar::new(date + Duration::days(i), 5.0, 5.0, 5.0, 5.0, 100))
            .collect();

        assert!(Adx::new(3).calculate(&flat).iter().all(Option::is_none));
    }

    #[test]
    fn test_cci_known_value() {
        let cci = Cci::new(3);
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        // Typical prices 1, 2, 3: mean 2, deviation 2/3
        let bars: Vec<Bar> = (0..3)
            .map(|i| {
                let p = 1.0 + i as f64;
                Bar::new(date + Duration::days(i), p, p, p, p, 1)
            })
            .collect();
        let value = cci.latest(&bars).unwrap();

        assert!((value - 1.0 / (0.015 * 2.0 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_cci_flat_is_zero() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let flat: Vec<Bar> = (0..25)
            .map(|i| Bar::new(date + Duration::days(i), 5.0, 5.0, 5.0, 5.0, 100))
            .collect();

        assert_eq!(Cci::default().latest(&flat), Some(0.0));
    }

    #[test]
    fn test_cci_insufficient_data() {
        let cci = Cci::default();
        let bars = rising(19);

        assert!(cci.calculate(&bars).iter().all(Option::is_none));
        assert!(cci.validate_data(&bars).is_err());
    }
}
