//! Point-in-time analysis of a bar series.
//!
//! Every indicator is computed over the full series and classified by its
//! value at the last bar. Readings are grouped into oscillators and moving
//! averages, each with its own tally, plus an overall tally.

use serde::{Deserialize, Serialize};
use stockscope_core::error::{AnalysisError, IndicatorError};
use stockscope_core::traits::{Indicator, OhlcvIndicator};
use stockscope_core::types::{Bar, BarSeries, SignalTally, StockInfo};
use stockscope_indicators::{
    Adx, AwesomeOscillator, BollingerPercentB, Cci, ChaikinMoneyFlow, Ema, HullMa,
    IchimokuBaseLine, Macd, Rsi, Sma, Stochastic, StochasticRsi, UltimateOscillator, Vwma,
    WilliamsR,
};
use tracing::{debug, info, warn};

use crate::classifier::{IndicatorGroup, IndicatorResult, ThresholdRule};

/// Name of the oscillator group.
pub const OSCILLATORS: &str = "oscillators";
/// Name of the moving-average group.
pub const MOVING_AVERAGES: &str = "moving_averages";

/// Indicator periods used by the analyzer and the trend detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    pub rsi_period: usize,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub stochastic_slowing: usize,
    pub cci_period: usize,
    pub adx_period: usize,
    pub ao_fast: usize,
    pub ao_slow: usize,
    pub williams_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub stoch_rsi_rsi: usize,
    pub stoch_rsi_stoch: usize,
    pub stoch_rsi_k: usize,
    pub stoch_rsi_d: usize,
    pub cmf_period: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
    pub uo_short: usize,
    pub uo_mid: usize,
    pub uo_long: usize,
    /// Each period yields one EMA and one SMA reading
    pub ma_periods: Vec<usize>,
    pub ichimoku_period: usize,
    pub vwma_period: usize,
    pub hull_period: usize,
    pub kdj_n: usize,
    pub kdj_k: usize,
    pub kdj_d: usize,
    /// Series shorter than this are analyzed with a warning
    pub min_bars_warning: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stochastic_k: 14,
            stochastic_d: 3,
            stochastic_slowing: 3,
            cci_period: 20,
            adx_period: 14,
            ao_fast: 5,
            ao_slow: 34,
            williams_period: 10,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            stoch_rsi_rsi: 14,
            stoch_rsi_stoch: 14,
            stoch_rsi_k: 3,
            stoch_rsi_d: 3,
            cmf_period: 14,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
            uo_short: 7,
            uo_mid: 14,
            uo_long: 28,
            ma_periods: vec![10, 20, 30, 50, 100, 200],
            ichimoku_period: 26,
            vwma_period: 20,
            hull_period: 9,
            kdj_n: 9,
            kdj_k: 3,
            kdj_d: 3,
            min_bars_warning: 20,
        }
    }
}

impl AnalysisParams {
    /// Check every period before any indicator is constructed.
    pub fn validate(&self) -> Result<(), IndicatorError> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("stochastic_k", self.stochastic_k),
            ("stochastic_d", self.stochastic_d),
            ("stochastic_slowing", self.stochastic_slowing),
            ("cci_period", self.cci_period),
            ("adx_period", self.adx_period),
            ("ao_fast", self.ao_fast),
            ("williams_period", self.williams_period),
            ("macd_fast", self.macd_fast),
            ("macd_signal", self.macd_signal),
            ("stoch_rsi_rsi", self.stoch_rsi_rsi),
            ("stoch_rsi_stoch", self.stoch_rsi_stoch),
            ("stoch_rsi_k", self.stoch_rsi_k),
            ("stoch_rsi_d", self.stoch_rsi_d),
            ("cmf_period", self.cmf_period),
            ("uo_short", self.uo_short),
            ("ichimoku_period", self.ichimoku_period),
            ("vwma_period", self.vwma_period),
            ("kdj_n", self.kdj_n),
            ("kdj_k", self.kdj_k),
            ("kdj_d", self.kdj_d),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(IndicatorError::InvalidParameter(format!(
                "{} must be greater than 0",
                name
            )));
        }

        if self.macd_fast >= self.macd_slow {
            return Err(IndicatorError::InvalidParameter(
                "MACD fast period must be less than slow period".into(),
            ));
        }
        if self.ao_fast >= self.ao_slow {
            return Err(IndicatorError::InvalidParameter(
                "AO fast period must be less than slow period".into(),
            ));
        }
        if self.uo_short > self.uo_mid || self.uo_mid > self.uo_long {
            return Err(IndicatorError::InvalidParameter(
                "Ultimate Oscillator periods must be ordered short <= mid <= long".into(),
            ));
        }
        if self.bollinger_period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_period must be at least 2".into(),
            ));
        }
        if !self.bollinger_std_dev.is_finite() || self.bollinger_std_dev <= 0.0 {
            return Err(IndicatorError::InvalidParameter(
                "bollinger_std_dev must be positive".into(),
            ));
        }
        if self.hull_period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "hull_period must be at least 2".into(),
            ));
        }
        if self.ma_periods.is_empty() || self.ma_periods.contains(&0) {
            return Err(IndicatorError::InvalidParameter(
                "ma_periods must be non-empty and positive".into(),
            ));
        }
        Ok(())
    }
}

/// Indicator reading before classification.
#[derive(Debug, Clone)]
pub(crate) struct Reading {
    pub name: String,
    pub value: Option<f64>,
    pub rule: ThresholdRule,
}

impl Reading {
    fn new(name: String, value: Option<f64>, rule: ThresholdRule) -> Self {
        Self { name, value, rule }
    }
}

/// Result of analyzing one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct StockAnalysis {
    pub stock: StockInfo,
    pub oscillators: IndicatorGroup,
    pub moving_averages: IndicatorGroup,
    /// Sum of both group tallies
    pub overall: SignalTally,
}

/// Computes and classifies every indicator for a series.
#[derive(Debug, Clone)]
pub struct Analyzer {
    params: AnalysisParams,
}

impl Analyzer {
    /// Create an analyzer; rejects invalid periods.
    pub fn new(params: AnalysisParams) -> Result<Self, IndicatorError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Analyze a series whose display name has already been resolved.
    ///
    /// Fails only on an empty series. Short series produce undefined
    /// (neutral) readings for the indicators they cannot support.
    pub fn analyze(
        &self,
        series: &BarSeries,
        name: &str,
    ) -> Result<StockAnalysis, AnalysisError> {
        let last = series.last().ok_or_else(|| AnalysisError::EmptySeries {
            symbol: series.symbol.clone(),
        })?;

        if series.len() < self.params.min_bars_warning {
            warn!(
                symbol = %series.symbol,
                bars = series.len(),
                "Fewer than {} bars; some indicators will be undefined",
                self.params.min_bars_warning
            );
        }

        let bars = series.bars();
        let close = last.close;
        let oscillators = classify(OSCILLATORS, self.oscillator_readings(bars), close);
        let moving_averages = classify(MOVING_AVERAGES, self.moving_average_readings(bars), close);
        let overall = oscillators.tally() + moving_averages.tally();

        info!(
            symbol = %series.symbol,
            bars = series.len(),
            buy = overall.buy,
            sell = overall.sell,
            neutral = overall.neutral,
            "Analysis complete"
        );

        Ok(StockAnalysis {
            stock: StockInfo {
                symbol: series.symbol.clone(),
                name: name.to_string(),
                latest_close: close,
                latest_date: last.date,
            },
            oscillators,
            moving_averages,
            overall,
        })
    }

    pub(crate) fn oscillator_readings(&self, bars: &[Bar]) -> Vec<Reading> {
        let p = &self.params;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        vec![
            Reading::new(
                format!("RSI ({})", p.rsi_period),
                latest_close(&Rsi::new(p.rsi_period), &closes),
                ThresholdRule::band(30.0, 70.0),
            ),
            Reading::new(
                format!(
                    "Stochastic %K ({}, {}, {})",
                    p.stochastic_k, p.stochastic_d, p.stochastic_slowing
                ),
                latest_bar(
                    &Stochastic::with_periods(
                        p.stochastic_k,
                        p.stochastic_d,
                        p.stochastic_slowing,
                    ),
                    bars,
                )
                .map(|s| s.k),
                ThresholdRule::band(20.0, 80.0),
            ),
            Reading::new(
                format!("CCI ({})", p.cci_period),
                latest_bar(&Cci::new(p.cci_period), bars),
                ThresholdRule::band(-100.0, 100.0),
            ),
            Reading::new(
                format!("ADX ({})", p.adx_period),
                latest_bar(&Adx::new(p.adx_period), bars).map(|a| a.adx),
                ThresholdRule::Informational,
            ),
            Reading::new(
                format!("Awesome Oscillator ({}, {})", p.ao_fast, p.ao_slow),
                latest_bar(&AwesomeOscillator::with_periods(p.ao_fast, p.ao_slow), bars),
                ThresholdRule::ZeroLine,
            ),
            Reading::new(
                format!("Williams %R ({})", p.williams_period),
                latest_bar(&WilliamsR::new(p.williams_period), bars),
                ThresholdRule::band(-80.0, -20.0),
            ),
            Reading::new(
                format!("MACD Level ({}, {})", p.macd_fast, p.macd_slow),
                latest_bar(
                    &Macd::with_periods(p.macd_fast, p.macd_slow, p.macd_signal),
                    bars,
                )
                .map(|m| m.histogram),
                ThresholdRule::ZeroLine,
            ),
            Reading::new(
                format!(
                    "Stochastic RSI Fast ({}, {}, {}, {})",
                    p.stoch_rsi_k, p.stoch_rsi_d, p.stoch_rsi_rsi, p.stoch_rsi_stoch
                ),
                latest_bar(
                    &StochasticRsi::with_periods(
                        p.stoch_rsi_rsi,
                        p.stoch_rsi_stoch,
                        p.stoch_rsi_k,
                        p.stoch_rsi_d,
                    ),
                    bars,
                )
                .map(|s| s.k),
                ThresholdRule::band(20.0, 80.0),
            ),
            Reading::new(
                format!("Chaikin Money Flow ({})", p.cmf_period),
                latest_bar(&ChaikinMoneyFlow::new(p.cmf_period), bars),
                ThresholdRule::ZeroLine,
            ),
            Reading::new(
                format!("Bollinger %B ({})", p.bollinger_period),
                latest_bar(
                    &BollingerPercentB::with_params(p.bollinger_period, p.bollinger_std_dev),
                    bars,
                ),
                ThresholdRule::band(0.0, 1.0),
            ),
            Reading::new(
                format!(
                    "Ultimate Oscillator ({}, {}, {})",
                    p.uo_short, p.uo_mid, p.uo_long
                ),
                latest_bar(
                    &UltimateOscillator::with_periods(p.uo_short, p.uo_mid, p.uo_long),
                    bars,
                ),
                ThresholdRule::band(30.0, 70.0),
            ),
        ]
    }

    pub(crate) fn moving_average_readings(&self, bars: &[Bar]) -> Vec<Reading> {
        let p = &self.params;
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let rule = ThresholdRule::PriceVsAverage;

        let mut readings = Vec::with_capacity(2 * p.ma_periods.len() + 3);
        for &period in &p.ma_periods {
            readings.push(Reading::new(
                format!("EMA ({})", period),
                latest_close(&Ema::new(period), &closes),
                rule,
            ));
            readings.push(Reading::new(
                format!("SMA ({})", period),
                latest_close(&Sma::new(period), &closes),
                rule,
            ));
        }

        readings.push(Reading::new(
            format!("Ichimoku Base Line ({})", p.ichimoku_period),
            latest_bar(&IchimokuBaseLine::new(p.ichimoku_period), bars),
            rule,
        ));
        readings.push(Reading::new(
            format!("VWMA ({})", p.vwma_period),
            latest_bar(&Vwma::new(p.vwma_period), bars),
            rule,
        ));
        readings.push(Reading::new(
            format!("Hull MA ({})", p.hull_period),
            latest_close(&HullMa::new(p.hull_period), &closes),
            rule,
        ));
        readings
    }
}

fn classify(name: &str, readings: Vec<Reading>, close: f64) -> IndicatorGroup {
    let mut group = IndicatorGroup::new(name);
    for reading in readings {
        group.push(IndicatorResult::evaluate(
            reading.name,
            reading.value,
            reading.rule,
            close,
        ));
    }
    group
}

fn latest_close<I: Indicator>(indicator: &I, closes: &[f64]) -> Option<f64> {
    if let Err(e) = indicator.validate_data(closes) {
        debug!(indicator = indicator.name(), error = %e, "Insufficient history");
    }
    indicator.latest(closes)
}

fn latest_bar<I: OhlcvIndicator>(indicator: &I, bars: &[Bar]) -> Option<I::Output> {
    if let Err(e) = indicator.validate_data(bars) {
        debug!(indicator = indicator.name(), error = %e, "Insufficient history");
    }
    indicator.latest(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use stockscope_core::types::Signal;

    fn series(closes: &[f64]) -> BarSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    start + Duration::days(i as i64),
                    close,
                    close + 0.01,
                    close,
                    close,
                    1_000_000,
                )
            })
            .collect();
        BarSeries::new("600519", bars).unwrap()
    }

    fn accelerating(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let i = i as f64;
                100.0 + i + 0.01 * i * i
            })
            .collect()
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(AnalysisParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = AnalysisParams {
            macd_fast: 26,
            macd_slow: 12,
            ..Default::default()
        };
        assert!(matches!(
            Analyzer::new(params),
            Err(IndicatorError::InvalidParameter(_))
        ));

        let params = AnalysisParams {
            rsi_period: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_empty_series_fails() {
        let analyzer = Analyzer::new(AnalysisParams::default()).unwrap();
        let empty = BarSeries::new("000001", vec![]).unwrap();

        assert!(matches!(
            analyzer.analyze(&empty, "Ping An Bank"),
            Err(AnalysisError::EmptySeries { .. })
        ));
    }

    #[test]
    fn test_uptrend_scenario() {
        let analyzer = Analyzer::new(AnalysisParams::default()).unwrap();
        let closes = accelerating(250);
        let analysis = analyzer.analyze(&series(&closes), "Kweichow Moutai").unwrap();

        assert_eq!(analysis.stock.symbol, "600519");
        assert_eq!(analysis.stock.name, "Kweichow Moutai");
        assert!((analysis.stock.latest_close - closes[249]).abs() < 1e-10);

        // Price above every average
        assert_eq!(analysis.moving_averages.len(), 15);
        for result in analysis.moving_averages.indicators() {
            assert_eq!(result.signal, Signal::Buy, "{}", result.name);
        }

        let rsi = analysis.oscillators.get("RSI (14)").unwrap();
        assert!(rsi.value.unwrap() > 99.9);
        assert_eq!(rsi.signal, Signal::Sell);

        let adx = analysis.oscillators.get("ADX (14)").unwrap();
        assert!(adx.value.unwrap() > 90.0);
        assert_eq!(adx.signal, Signal::Neutral);
    }

    #[test]
    fn test_tallies_are_consistent() {
        let analyzer = Analyzer::new(AnalysisParams::default()).unwrap();
        let closes: Vec<f64> = (0..120)
            .map(|i| 50.0 + (i as f64 * 0.3).sin() * 5.0)
            .collect();
        let analysis = analyzer.analyze(&series(&closes), "Test").unwrap();

        assert_eq!(analysis.oscillators.len(), 11);
        assert_eq!(analysis.oscillators.tally().total(), 11);
        assert_eq!(analysis.moving_averages.tally().total(), 15);
        assert_eq!(
            analysis.overall,
            analysis.oscillators.tally() + analysis.moving_averages.tally()
        );
    }

    #[test]
    fn test_short_series_is_neutral_not_fatal() {
        let analyzer = Analyzer::new(AnalysisParams::default()).unwrap();
        let analysis = analyzer
            .analyze(&series(&[10.0, 10.5, 10.2, 10.8, 11.0]), "Short")
            .unwrap();

        for name in [
            "CCI (20)",
            "ADX (14)",
            "Awesome Oscillator (5, 34)",
            "Ultimate Oscillator (7, 14, 28)",
        ] {
            let result = analysis.oscillators.get(name).unwrap();
            assert_eq!(result.value, None, "{}", name);
            assert_eq!(result.signal, Signal::Neutral);
        }
        assert_eq!(analysis.moving_averages.tally().neutral, 15);
    }
}
