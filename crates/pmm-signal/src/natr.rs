//! Normalized Average True Range.
//!
//! Volatility as a dimensionless fraction of price: simple moving average
//! of the True Range over `period` candles, divided by the latest close.

use crate::error::{Result, SignalError};
use pmm_core::Candle;
use rust_decimal::Decimal;

/// Compute NATR over the last `period` candles of the window.
///
/// The period must be positive, else `SignalError::InvalidParameters`.
/// Requires `period + 1` candles since True Range needs a previous close.
/// The result is always >= 0; a zero latest close yields 0 ("no observed
/// volatility") rather than dividing by zero.
pub fn natr(candles: &[Candle], period: usize) -> Result<Decimal> {
    if period == 0 {
        return Err(SignalError::InvalidParameters(
            "natr period must be positive".to_string(),
        ));
    }
    let required = period + 1;
    if candles.len() < required {
        return Err(SignalError::InsufficientData {
            required,
            available: candles.len(),
        });
    }

    let window = &candles[candles.len() - required..];
    let mut tr_sum = Decimal::ZERO;
    for pair in window.windows(2) {
        tr_sum += pair[1].true_range(pair[0].close);
    }
    let atr = tr_sum / Decimal::from(period as u64);

    let last_close = window[required - 1].close;
    if last_close.is_zero() {
        return Ok(Decimal::ZERO);
    }
    Ok(atr / last_close.inner())
}
