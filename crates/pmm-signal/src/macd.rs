//! Moving Average Convergence Divergence.
//!
//! MACD line = EMA(fast) - EMA(slow) of closes, signal line = EMA of the
//! MACD line, histogram = MACD line - signal line. Each EMA is seeded by a
//! simple moving average over its first `span` samples and then follows
//! `ema += k * (price - ema)` with `k = 2 / (span + 1)`, which is the
//! standard recursion `EMA_t = price_t * k + EMA_{t-1} * (1 - k)`.

use crate::error::{Result, SignalError};
use rust_decimal::Decimal;

/// MACD output: histogram plus its intermediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdOutput {
    /// Latest fast EMA of closes.
    pub fast_ema: Decimal,
    /// Latest slow EMA of closes.
    pub slow_ema: Decimal,
    /// MACD line: fast_ema - slow_ema.
    pub macd: Decimal,
    /// Signal line: EMA of the MACD line.
    pub signal: Decimal,
    /// Histogram: macd - signal. Sign is trend direction, magnitude is
    /// strength (unbounded; normalized by the composer before use).
    pub histogram: Decimal,
}

/// EMA series over `values` with the given span; the first element is the
/// SMA seed at input index `span - 1`, one element per input thereafter.
fn ema_series(values: &[Decimal], span: usize) -> Vec<Decimal> {
    let k = Decimal::TWO / Decimal::from(span as u64 + 1);
    let seed =
        values[..span].iter().copied().sum::<Decimal>() / Decimal::from(span as u64);
    let mut out = Vec::with_capacity(values.len() - span + 1);
    let mut ema = seed;
    out.push(ema);
    for v in &values[span..] {
        ema += k * (*v - ema);
        out.push(ema);
    }
    out
}

/// Compute MACD over the full window of closes (oldest first).
///
/// Spans must satisfy `0 < fast < slow` and `signal > 0`, else
/// `SignalError::InvalidParameters`. Requires `slow + signal` closes,
/// else `SignalError::InsufficientData`.
pub fn macd(closes: &[Decimal], fast: usize, slow: usize, signal: usize) -> Result<MacdOutput> {
    if fast == 0 || signal == 0 || fast >= slow {
        return Err(SignalError::InvalidParameters(format!(
            "macd spans must satisfy 0 < fast < slow and signal > 0, \
             got fast={fast} slow={slow} signal={signal}"
        )));
    }
    let required = slow + signal;
    if closes.len() < required {
        return Err(SignalError::InsufficientData {
            required,
            available: closes.len(),
        });
    }

    let fast_series = ema_series(closes, fast);
    let slow_series = ema_series(closes, slow);

    // MACD line is defined from input index slow - 1 onward, where both
    // EMAs exist. fast_series starts earlier and is offset accordingly.
    let offset = slow - fast;
    let macd_line: Vec<Decimal> = slow_series
        .iter()
        .enumerate()
        .map(|(i, slow_ema)| fast_series[i + offset] - slow_ema)
        .collect();

    let signal_series = ema_series(&macd_line, signal);

    // The length check above guarantees every series is non-empty.
    let (fast_ema, slow_ema, macd_value, signal_value) = match (
        fast_series.last(),
        slow_series.last(),
        macd_line.last(),
        signal_series.last(),
    ) {
        (Some(f), Some(s), Some(m), Some(g)) => (*f, *s, *m, *g),
        _ => {
            return Err(SignalError::InsufficientData {
                required,
                available: closes.len(),
            })
        }
    };

    Ok(MacdOutput {
        fast_ema,
        slow_ema,
        macd: macd_value,
        signal: signal_value,
        histogram: macd_value - signal_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_data() {
        let closes = vec![dec!(2000); 34];
        let err = macd(&closes, 12, 26, 9).unwrap_err();
        assert_eq!(
            err,
            SignalError::InsufficientData {
                required: 35,
                available: 34
            }
        );
    }

    #[test]
    fn test_flat_market_zero_histogram() {
        let closes = vec![dec!(2000); 35];
        let out = macd(&closes, 12, 26, 9).unwrap();
        // Flat input: every EMA sits exactly on the price
        assert_eq!(out.fast_ema, dec!(2000));
        assert_eq!(out.slow_ema, dec!(2000));
        assert_eq!(out.macd, dec!(0));
        assert_eq!(out.signal, dec!(0));
        assert_eq!(out.histogram, dec!(0));
    }

    #[test]
    fn test_uptrend_positive_histogram() {
        // Steady ramp: fast EMA leads the slow EMA and the MACD line keeps
        // rising, so it stays above its own signal line.
        let closes: Vec<Decimal> = (0..40).map(|i| Decimal::from(2000 + i * 2)).collect();
        let out = macd(&closes, 12, 26, 9).unwrap();
        assert!(out.fast_ema > out.slow_ema);
        assert!(out.macd > dec!(0));
        assert!(out.histogram > dec!(0));
    }

    #[test]
    fn test_downtrend_negative_histogram() {
        let closes: Vec<Decimal> = (0..40).map(|i| Decimal::from(2100 - i * 2)).collect();
        let out = macd(&closes, 12, 26, 9).unwrap();
        assert!(out.fast_ema < out.slow_ema);
        assert!(out.macd < dec!(0));
        assert!(out.histogram < dec!(0));
    }

    #[test]
    fn test_histogram_matches_intermediates() {
        let closes: Vec<Decimal> = (0..50)
            .map(|i| Decimal::from(2000) + Decimal::from(i % 7))
            .collect();
        let out = macd(&closes, 12, 26, 9).unwrap();
        assert_eq!(out.macd, out.fast_ema - out.slow_ema);
        assert_eq!(out.histogram, out.macd - out.signal);
    }

    #[test]
    fn test_degenerate_spans_rejected() {
        let closes = vec![dec!(2000); 50];
        assert!(matches!(
            macd(&closes, 26, 26, 9),
            Err(SignalError::InvalidParameters(_))
        ));
        assert!(matches!(
            macd(&closes, 30, 26, 9),
            Err(SignalError::InvalidParameters(_))
        ));
        assert!(matches!(
            macd(&closes, 12, 26, 0),
            Err(SignalError::InvalidParameters(_))
        ));
        assert!(matches!(
            macd(&closes, 0, 26, 9),
            Err(SignalError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_ema_series_seed_is_sma() {
        let values = vec![dec!(1), dec!(2), dec!(3), dec!(4)];
        let series = ema_series(&values, 3);
        // seed = (1 + 2 + 3) / 3 = 2, then ema += 0.5 * (4 - 2) = 3
        assert_eq!(series[0], dec!(2));
        assert_eq!(series[1], dec!(3));
    }
}
