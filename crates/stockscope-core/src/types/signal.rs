//! Categorical trading signals and their tallies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Discretized reading of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Neutral,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Count of signals per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalTally {
    pub buy: usize,
    pub sell: usize,
    pub neutral: usize,
}

impl SignalTally {
    /// Add one signal.
    pub fn record(&mut self, signal: Signal) {
        match signal {
            Signal::Buy => self.buy += 1,
            Signal::Sell => self.sell += 1,
            Signal::Neutral => self.neutral += 1,
        }
    }

    /// Total number of signals counted.
    pub fn total(&self) -> usize {
        self.buy + self.sell + self.neutral
    }
}

impl Add for SignalTally {
    type Output = SignalTally;

    fn add(self, rhs: SignalTally) -> SignalTally {
        SignalTally {
            buy: self.buy + rhs.buy,
            sell: self.sell + rhs.sell,
            neutral: self.neutral + rhs.neutral,
        }
    }
}
