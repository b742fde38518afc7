//! Technical indicators over daily OHLCV series.
//!
//! Every indicator returns one slot per input bar, aligned by index, with
//! `None` where the value is undefined (not enough history, or a
//! degenerate denominator). Callers pick the last slot for a point-in-time
//! reading or walk the whole series for crossover detection.
//!
//! - Moving averages (SMA, EMA, WMA, Hull, VWMA, Ichimoku base line)
//! - Momentum indicators (RSI, MACD, Awesome Oscillator, Ultimate Oscillator)
//! - Range oscillators (Stochastic, Stochastic RSI, KDJ, Williams %R)
//! - Trend indicators (ADX, CCI)
//! - Volatility and volume indicators (Bollinger %B, StdDev, CMF)

pub mod momentum;
pub mod moving_average;
pub mod rolling;
pub mod stochastic;
pub mod trend;
pub mod volatility;
pub mod volume;

pub use momentum::{AwesomeOscillator, Macd, MacdOutput, Rsi, UltimateOscillator};
pub use moving_average::{Ema, HullMa, IchimokuBaseLine, Sma, Vwma, Wma};
pub use stochastic::{Kdj, KdjOutput, Stochastic, StochasticOutput, StochasticRsi, WilliamsR};
pub use trend::{Adx, AdxOutput, Cci};
pub use volatility::{BollingerPercentB, StdDev};
pub use volume::ChaikinMoneyFlow;
