//! Trailing-window trend view with crossover events.
//!
//! Indicator frames are computed once over the whole series. The window is
//! a view onto the last bars of that series, and every event compares a
//! bar with its predecessor in the full series, so the oldest bar of the
//! window still sees the bar just before it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use stockscope_core::error::{AnalysisError, IndicatorError};
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::{Bar, BarSeries};
use stockscope_indicators::rolling::{defined, rolling_mean};
use stockscope_indicators::{Kdj, Macd, Rsi};
use tracing::{debug, warn};

use crate::analysis::AnalysisParams;

/// RSI level a rebound has to reclaim.
pub const RSI_REBOUND_LEVEL: f64 = 30.0;

/// Trend view settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSettings {
    /// Number of trailing bars reported
    pub window: usize,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self { window: 5 }
    }
}

impl TrendSettings {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.window == 0 {
            return Err(IndicatorError::InvalidParameter(
                "trend window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Indicator values at one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub ma5: Option<f64>,
    pub ma10: Option<f64>,
    pub ma20: Option<f64>,
    pub vol_ma5: Option<f64>,
    pub vol_ma10: Option<f64>,
    pub dif: Option<f64>,
    pub dea: Option<f64>,
    pub macd_hist: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub j: Option<f64>,
    pub rsi6: Option<f64>,
    pub rsi12: Option<f64>,
    pub rsi24: Option<f64>,
}

/// Events detected at one bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendFlags {
    /// DIF crossed above DEA
    pub macd_golden_cross: bool,
    /// K crossed above D
    pub kdj_golden_cross: bool,
    /// RSI6 climbed back to 30 or above
    pub rsi_rebound: bool,
    /// MA5 > MA10 > MA20 and close > MA20
    pub ma_bullish: bool,
}

impl TrendFlags {
    /// Evaluate the events at `current`; `previous` is `None` for the first
    /// bar of a series, which never crosses.
    pub fn detect(
        previous: Option<&IndicatorFrame>,
        current: &IndicatorFrame,
        close: f64,
    ) -> Self {
        let crossed = |prev_fast: Option<f64>, prev_slow: Option<f64>, fast, slow| {
            matches!(
                (prev_fast, prev_slow, fast, slow),
                (Some(pf), Some(ps), Some(f), Some(s)) if pf < ps && f > s
            )
        };

        let (macd_golden_cross, kdj_golden_cross, rsi_rebound) = match previous {
            Some(prev) => (
                crossed(prev.dif, prev.dea, current.dif, current.dea),
                crossed(prev.k, prev.d, current.k, current.d),
                matches!(
                    (prev.rsi6, current.rsi6),
                    (Some(p), Some(c)) if p < RSI_REBOUND_LEVEL && c >= RSI_REBOUND_LEVEL
                ),
            ),
            None => (false, false, false),
        };

        let ma_bullish = matches!(
            (current.ma5, current.ma10, current.ma20),
            (Some(ma5), Some(ma10), Some(ma20)) if ma5 > ma10 && ma10 > ma20 && close > ma20
        );

        Self {
            macd_golden_cross,
            kdj_golden_cross,
            rsi_rebound,
            ma_bullish,
        }
    }

    /// Whether any event fired.
    pub fn any(&self) -> bool {
        self.macd_golden_cross || self.kdj_golden_cross || self.rsi_rebound || self.ma_bullish
    }
}

/// One bar of the trend view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub volume: u64,
    #[serde(flatten)]
    pub indicators: IndicatorFrame,
    #[serde(flatten)]
    pub flags: TrendFlags,
}

/// Snapshots for the last `window` bars, oldest first.
///
/// `frames` must be aligned with `bars` and cover the full series.
pub fn window_snapshots(
    bars: &[Bar],
    frames: &[IndicatorFrame],
    window: usize,
) -> Vec<TrendSnapshot> {
    let len = bars.len().min(frames.len());
    let start = len.saturating_sub(window);

    (start..len)
        .map(|i| {
            let previous = i.checked_sub(1).map(|p| &frames[p]);
            TrendSnapshot {
                date: bars[i].date,
                close: bars[i].close,
                volume: bars[i].volume,
                indicators: frames[i],
                flags: TrendFlags::detect(previous, &frames[i], bars[i].close),
            }
        })
        .collect()
}

/// Builds indicator frames and the trailing trend view.
#[derive(Debug, Clone)]
pub struct TrendDetector {
    window: usize,
    min_bars_warning: usize,
    macd: Macd,
    kdj: Kdj,
}

impl TrendDetector {
    pub fn new(
        settings: &TrendSettings,
        params: &AnalysisParams,
    ) -> Result<Self, IndicatorError> {
        settings.validate()?;
        params.validate()?;
        Ok(Self {
            window: settings.window,
            min_bars_warning: params.min_bars_warning,
            macd: Macd::with_periods(params.macd_fast, params.macd_slow, params.macd_signal),
            kdj: Kdj::with_periods(params.kdj_n, params.kdj_k, params.kdj_d),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Indicator frames for every bar of the series.
    ///
    /// MACD lines run from the first bar so crossovers show on short series.
    pub fn frames(&self, bars: &[Bar]) -> Vec<IndicatorFrame> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
        let (closes_def, volumes_def) = (defined(&closes), defined(&volumes));

        let ma5 = rolling_mean(&closes_def, 5);
        let ma10 = rolling_mean(&closes_def, 10);
        let ma20 = rolling_mean(&closes_def, 20);
        let vol_ma5 = rolling_mean(&volumes_def, 5);
        let vol_ma10 = rolling_mean(&volumes_def, 10);
        let macd = self.macd.lines(&closes);
        let kdj = self.kdj.calculate(bars);
        let rsi6 = Rsi::new(6).calculate(&closes);
        let rsi12 = Rsi::new(12).calculate(&closes);
        let rsi24 = Rsi::new(24).calculate(&closes);

        (0..bars.len())
            .map(|i| IndicatorFrame {
                ma5: ma5[i],
                ma10: ma10[i],
                ma20: ma20[i],
                vol_ma5: vol_ma5[i],
                vol_ma10: vol_ma10[i],
                dif: macd[i].map(|m| m.dif),
                dea: macd[i].map(|m| m.dea),
                macd_hist: macd[i].map(|m| m.histogram),
                k: kdj[i].map(|o| o.k),
                d: kdj[i].map(|o| o.d),
                j: kdj[i].map(|o| o.j),
                rsi6: rsi6[i],
                rsi12: rsi12[i],
                rsi24: rsi24[i],
            })
            .collect()
    }

    /// Trend view over the trailing window of `series`.
    pub fn detect(&self, series: &BarSeries) -> Result<Vec<TrendSnapshot>, AnalysisError> {
        if series.is_empty() {
            return Err(AnalysisError::EmptySeries {
                symbol: series.symbol.clone(),
            });
        }

        if series.len() < self.min_bars_warning {
            warn!(
                symbol = %series.symbol,
                bars = series.len(),
                "Fewer than {} bars; trend indicators may be undefined",
                self.min_bars_warning
            );
        }

        let frames = self.frames(series.bars());
        let snapshots = window_snapshots(series.bars(), &frames, self.window);
        debug!(
            symbol = %series.symbol,
            bars = series.len(),
            events = snapshots.iter().filter(|s| s.flags.any()).count(),
            "Trend window computed"
        );
        Ok(snapshots)
    }
}
