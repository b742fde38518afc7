//! Threshold rules and grouped indicator readings.

use serde::{Deserialize, Serialize};
use stockscope_core::types::{Signal, SignalTally};

/// Rule mapping an indicator value to a signal.
///
/// Bounds are exclusive: a value exactly on a threshold is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThresholdRule {
    /// BUY below `buy_below`, SELL above `sell_above`.
    Band { buy_below: f64, sell_above: f64 },
    /// BUY above zero, SELL below.
    ZeroLine,
    /// Reported but never signals.
    Informational,
    /// Moving average: BUY when the close is above it, SELL when below.
    PriceVsAverage,
}

impl ThresholdRule {
    pub const fn band(buy_below: f64, sell_above: f64) -> Self {
        ThresholdRule::Band {
            buy_below,
            sell_above,
        }
    }

    /// Classify a value; `close` is only read by `PriceVsAverage`.
    ///
    /// Undefined values are neutral.
    pub fn classify(&self, value: Option<f64>, close: f64) -> Signal {
        let value = match value {
            Some(v) if v.is_finite() => v,
            _ => return Signal::Neutral,
        };

        match *self {
            ThresholdRule::Band {
                buy_below,
                sell_above,
            } => {
                if value < buy_below {
                    Signal::Buy
                } else if value > sell_above {
                    Signal::Sell
                } else {
                    Signal::Neutral
                }
            }
            ThresholdRule::ZeroLine => {
                if value > 0.0 {
                    Signal::Buy
                } else if value < 0.0 {
                    Signal::Sell
                } else {
                    Signal::Neutral
                }
            }
            ThresholdRule::Informational => Signal::Neutral,
            ThresholdRule::PriceVsAverage => {
                if close > value {
                    Signal::Buy
                } else if close < value {
                    Signal::Sell
                } else {
                    Signal::Neutral
                }
            }
        }
    }

    /// Human-readable form, e.g. `BUY < 30, SELL > 70`.
    pub fn describe(&self) -> String {
        match *self {
            ThresholdRule::Band {
                buy_below,
                sell_above,
            } => format!("BUY < {}, SELL > {}", buy_below, sell_above),
            ThresholdRule::ZeroLine => "BUY > 0, SELL < 0".to_string(),
            ThresholdRule::Informational => "informational, never signals".to_string(),
            ThresholdRule::PriceVsAverage => "BUY close > MA, SELL close < MA".to_string(),
        }
    }
}

/// One classified indicator reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
    /// Indicator name with its parameters, e.g. `RSI (14)`
    pub name: String,
    /// Latest value; `None` when undefined
    pub value: Option<f64>,
    pub signal: Signal,
}

impl IndicatorResult {
    /// Classify `value` under `rule`.
    pub fn evaluate(
        name: impl Into<String>,
        value: Option<f64>,
        rule: ThresholdRule,
        close: f64,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            signal: rule.classify(value, close),
        }
    }
}

/// Named set of readings with a tally that always matches its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorGroup {
    name: String,
    indicators: Vec<IndicatorResult>,
    tally: SignalTally,
}

impl IndicatorGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            indicators: Vec::new(),
            tally: SignalTally::default(),
        }
    }

    /// Add a reading and count its signal.
    pub fn push(&mut self, result: IndicatorResult) {
        self.tally.record(result.signal);
        self.indicators.push(result);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn indicators(&self) -> &[IndicatorResult] {
        &self.indicators
    }

    pub fn tally(&self) -> SignalTally {
        self.tally
    }

    /// Find a reading by exact name.
    pub fn get(&self, name: &str) -> Option<&IndicatorResult> {
        self.indicators.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}
