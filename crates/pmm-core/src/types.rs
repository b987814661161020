//! Market data and account snapshot types.
//!
//! `Candle` is the unit of history fed to the indicators; `TopOfBook` and
//! `Balances` are polled once per decision cycle and discarded after use.

use crate::{Price, Size};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed OHLCV candle. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    /// Open time of the bar.
    pub open_time: DateTime<Utc>,
    /// Open price.
    pub open: Price,
    /// High price.
    pub high: Price,
    /// Low price.
    pub low: Price,
    /// Close price.
    pub close: Price,
    /// Traded volume over the bar.
    pub volume: Size,
}

impl Candle {
    pub fn new(
        open_time: DateTime<Utc>,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Size,
    ) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// True Range against the previous close:
    /// max(high - low, |high - prev_close|, |low - prev_close|).
    pub fn true_range(&self, prev_close: Price) -> Decimal {
        let hl = self.high.inner() - self.low.inner();
        let hc = (self.high.inner() - prev_close.inner()).abs();
        let lc = (self.low.inner() - prev_close.inner()).abs();
        hl.max(hc).max(lc)
    }
}

/// Best bid and ask resting on the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopOfBook {
    /// Best (highest) bid price.
    pub best_bid: Price,
    /// Best (lowest) ask price.
    pub best_ask: Price,
    /// Timestamp when this snapshot was taken.
    pub received_at: DateTime<Utc>,
}

impl TopOfBook {
    pub fn new(best_bid: Price, best_ask: Price) -> Self {
        Self {
            best_bid,
            best_ask,
            received_at: Utc::now(),
        }
    }

    /// Both sides present and not crossed.
    pub fn is_valid(&self) -> bool {
        self.best_bid.is_positive()
            && self.best_ask.is_positive()
            && self.best_bid < self.best_ask
    }

    /// Midpoint between best bid and best ask.
    ///
    /// Returns None when the book is one-sided or crossed.
    pub fn mid_price(&self) -> Option<Price> {
        if !self.is_valid() {
            return None;
        }
        Some(Price::new(
            (self.best_bid.inner() + self.best_ask.inner()) / Decimal::TWO,
        ))
    }

    /// Spread in basis points relative to mid.
    pub fn spread_bps(&self) -> Option<Decimal> {
        let mid = self.mid_price()?;
        Some((self.best_ask.inner() - self.best_bid.inner()) / mid.inner() * Decimal::from(10000))
    }
}

/// Account balances for the traded pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Base asset balance (e.g. ETH in ETH-USDT).
    pub base: Decimal,
    /// Quote asset balance (e.g. USDT in ETH-USDT).
    pub quote: Decimal,
}

impl Balances {
    pub fn new(base: Decimal, quote: Decimal) -> Self {
        Self { base, quote }
    }

    /// Total portfolio value in quote terms at the given mid price.
    pub fn portfolio_value(&self, mid: Price) -> Decimal {
        self.base * mid.inner() + self.quote
    }
}
