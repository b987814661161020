//! Candle window and indicators for the pmm quoting bot.
//!
//! Provides the inputs of the quote composer:
//! - `CandleBuffer`: fixed-size sliding window of closed candles
//! - `natr`: Normalized Average True Range (volatility, fraction of price)
//! - `macd`: MACD histogram with EMA intermediates (trend)
//!
//! Both indicators recompute from a window snapshot each cycle and fail
//! explicitly with `SignalError::InsufficientData` until the window fills.

pub mod buffer;
pub mod config;
pub mod error;
pub mod macd;
pub mod natr;

pub use buffer::CandleBuffer;
pub use config::IndicatorConfig;
pub use error::SignalError;
pub use macd::{macd, MacdOutput};
pub use natr::natr;
