//! Sliding window of closed candles.
//!
//! The buffer is the only object shared between the ingestion path and the
//! decision path. Ingestion appends; the decision cycle takes an owned
//! snapshot at cycle start and computes from that.

use pmm_core::Candle;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Holds the most recent `capacity` closed candles, discarding older ones.
#[derive(Debug, Clone)]
pub struct CandleBuffer {
    candles: VecDeque<Candle>,
    capacity: usize,
}

impl CandleBuffer {
    /// Create an empty buffer retaining at most `capacity` candles.
    pub fn new(capacity: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a closed candle.
    ///
    /// Candles must arrive in strictly increasing `open_time` order; a
    /// stale or duplicate candle is rejected and `false` is returned.
    pub fn push(&mut self, candle: Candle) -> bool {
        if let Some(last) = self.candles.back() {
            if candle.open_time <= last.open_time {
                return false;
            }
        }
        self.candles.push_back(candle);
        while self.candles.len() > self.capacity {
            self.candles.pop_front();
        }
        true
    }

    /// Number of candles currently held.
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Whether the window has reached capacity.
    pub fn is_full(&self) -> bool {
        self.candles.len() >= self.capacity
    }

    /// Owned snapshot of the window, oldest first.
    pub fn snapshot(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }

    /// Close prices of the window, oldest first.
    pub fn closes(&self) -> Vec<Decimal> {
        self.candles.iter().map(|c| c.close.inner()).collect()
    }

    /// The most recent candle, if any.
    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pmm_core::{Price, Size};
    use rust_decimal_macros::dec;

    fn candle_at(minute: i64, close: Decimal) -> Candle {
        let t0 = chrono::DateTime::<Utc>::UNIX_EPOCH;
        Candle::new(
            t0 + Duration::minutes(minute),
            Price::new(close),
            Price::new(close),
            Price::new(close),
            Price::new(close),
            Size::new(dec!(1)),
        )
    }

    #[test]
    fn test_push_and_len() {
        let mut buf = CandleBuffer::new(5);
        assert!(buf.is_empty());
        assert!(buf.push(candle_at(0, dec!(2000))));
        assert!(buf.push(candle_at(1, dec!(2001))));
        assert_eq!(buf.len(), 2);
        assert!(!buf.is_full());
    }

    #[test]
    fn test_window_eviction() {
        let mut buf = CandleBuffer::new(3);
        for i in 0..5 {
            assert!(buf.push(candle_at(i, Decimal::from(2000 + i))));
        }
        assert_eq!(buf.len(), 3);
        assert!(buf.is_full());
        // Oldest two were discarded
        assert_eq!(buf.closes(), vec![dec!(2002), dec!(2003), dec!(2004)]);
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut buf = CandleBuffer::new(5);
        assert!(buf.push(candle_at(1, dec!(2000))));
        assert!(!buf.push(candle_at(0, dec!(1999))));
        assert!(!buf.push(candle_at(1, dec!(1999)))); // duplicate open_time
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.last().unwrap().close.inner(), dec!(2000));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buf = CandleBuffer::new(5);
        buf.push(candle_at(0, dec!(2000)));
        let snap = buf.snapshot();
        buf.push(candle_at(1, dec!(2001)));
        assert_eq!(snap.len(), 1);
        assert_eq!(buf.len(), 2);
    }
}
