//! Quote composition.
//!
//! Combines the volatility, trend, and inventory signals into half-spreads
//! and a skew, derives bid/ask from the mid price, and applies the
//! no-crossing sanity constraint against the current top of book.

use crate::config::QuoteConfig;
use crate::error::{QuoteError, Result};
use chrono::{DateTime, Utc};
use pmm_core::{Price, TopOfBook};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Per-cycle inputs to the composer. All ephemeral; recomputed each cycle.
#[derive(Debug, Clone, Copy)]
pub struct QuoteInputs {
    /// Mid price the quotes are centered on.
    pub mid: Price,
    /// NATR volatility as a fraction of price (>= 0).
    pub volatility: Decimal,
    /// Raw MACD histogram in price units (signed).
    pub macd_histogram: Decimal,
    /// Inventory penalty phi in [-1, 1].
    pub inventory_penalty: Decimal,
    /// Current top of book, used for the no-crossing constraint.
    pub top: TopOfBook,
    /// Cycle timestamp, stamped onto the decision unchanged.
    pub timestamp: DateTime<Utc>,
}

/// A sanity-checked pair of quote prices.
///
/// Invariants: `bid_price < mid_price < ask_price`, and both half-spreads
/// are at least `min_spread_bp / 10000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteDecision {
    pub bid_price: Price,
    pub ask_price: Price,
    pub mid_price: Price,
    /// Distance from mid to bid as a fraction of mid.
    pub half_spread_bid: Decimal,
    /// Distance from mid to ask as a fraction of mid.
    pub half_spread_ask: Decimal,
    pub timestamp: DateTime<Utc>,
}

/// Map the raw MACD histogram into [-1, 1].
///
/// The histogram is in price units, so it is first expressed in basis
/// points of mid, then divided by the configured saturation magnitude
/// `trend_norm_bp` and clamped.
fn normalize_trend(histogram: Decimal, mid: Decimal, trend_norm_bp: Decimal) -> Decimal {
    let hist_bp = histogram / mid * dec!(10000);
    (hist_bp / trend_norm_bp).max(dec!(-1)).min(dec!(1))
}

/// Compose a quote decision from the cycle's signals.
///
/// Sign conventions:
/// - positive trend (histogram > 0) narrows the bid side and widens the
///   ask side: buy more aggressively in an uptrend;
/// - positive phi (overweight base asset) widens the bid side and narrows
///   the ask side: discourage accumulation, encourage selling.
///
/// A quote that would cross or tie the top of book is pushed just outside
/// it by one tick, never inside. Fails with `InvalidQuote` if the adjusted
/// bid ends up at or above the ask; the caller should skip the cycle and
/// retain its prior quotes.
pub fn compose_quotes(inputs: &QuoteInputs, config: &QuoteConfig) -> Result<QuoteDecision> {
    let bps = dec!(10000);
    let mid = inputs.mid.inner();
    if mid <= Decimal::ZERO {
        return Err(QuoteError::InvalidQuote {
            bid: Decimal::ZERO,
            ask: Decimal::ZERO,
        });
    }

    // Volatility only ever widens the baseline spread.
    let base_half =
        config.base_spread_bp / bps + config.vol_multiplier * inputs.volatility.max(Decimal::ZERO);

    let trend = normalize_trend(inputs.macd_histogram, mid, config.trend_norm_bp);
    let trend_skew = config.trend_multiplier * trend;

    let phi = inputs.inventory_penalty.max(dec!(-1)).min(dec!(1));
    let inventory_skew = config.inventory_multiplier * phi;

    let floor = config.min_spread_bp / bps;
    let half_spread_bid = (base_half - trend_skew + inventory_skew).max(floor);
    let half_spread_ask = (base_half + trend_skew - inventory_skew).max(floor);

    let mut bid = mid * (Decimal::ONE - half_spread_bid);
    let mut ask = mid * (Decimal::ONE + half_spread_ask);

    // No crossing, no toxic fills: a quote at or through the top of book
    // is moved one tick outside it.
    let tick = config.tick_size.inner();
    if bid >= inputs.top.best_bid.inner() {
        bid = inputs.top.best_bid.inner() - tick;
    }
    if ask <= inputs.top.best_ask.inner() {
        ask = inputs.top.best_ask.inner() + tick;
    }

    if bid >= ask || bid <= Decimal::ZERO {
        return Err(QuoteError::InvalidQuote { bid, ask });
    }

    // Half-spreads reported against the final prices; the book adjustment
    // can only move quotes further out, so the floor still holds.
    Ok(QuoteDecision {
        bid_price: Price::new(bid),
        ask_price: Price::new(ask),
        mid_price: inputs.mid,
        half_spread_bid: (mid - bid) / mid,
        half_spread_ask: (ask - mid) / mid,
        timestamp: inputs.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_top(mid: Decimal) -> TopOfBook {
        // A book tighter than any spread these tests compose, so quotes
        // rest outside it and the crossing guard never engages
        TopOfBook::new(
            Price::new(mid * dec!(0.99995)),
            Price::new(mid * dec!(1.00005)),
        )
    }

    fn inputs(mid: Decimal) -> QuoteInputs {
        QuoteInputs {
            mid: Price::new(mid),
            volatility: Decimal::ZERO,
            macd_histogram: Decimal::ZERO,
            inventory_penalty: Decimal::ZERO,
            top: tight_top(mid),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_flat_market_symmetric_quotes() {
        // Zero volatility, zero trend, balanced inventory:
        // both half-spreads are the 10 bps baseline.
        let decision = compose_quotes(&inputs(dec!(2000)), &QuoteConfig::default()).unwrap();
        assert_eq!(decision.half_spread_bid, dec!(0.001));
        assert_eq!(decision.half_spread_ask, dec!(0.001));
        assert_eq!(decision.bid_price.inner(), dec!(1998.000));
        assert_eq!(decision.ask_price.inner(), dec!(2002.000));
    }

    #[test]
    fn test_bid_below_mid_below_ask() {
        let mut input = inputs(dec!(2000));
        input.volatility = dec!(0.004);
        input.macd_histogram = dec!(3);
        input.inventory_penalty = dec!(-0.4);
        let decision = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert!(decision.bid_price < decision.mid_price);
        assert!(decision.mid_price < decision.ask_price);
    }

    #[test]
    fn test_half_spread_floor() {
        // Strong uptrend narrows the bid side far below the baseline;
        // the floor of 1 bp must hold.
        let config = QuoteConfig {
            trend_multiplier: dec!(0.01), // 100 bps at saturation
            ..Default::default()
        };
        let mut input = inputs(dec!(2000));
        input.macd_histogram = dec!(100); // saturates the trend signal
        let decision = compose_quotes(&input, &config).unwrap();
        assert_eq!(decision.half_spread_bid, dec!(0.0001));
        assert!(decision.half_spread_ask >= dec!(0.0001));
    }

    #[test]
    fn test_idempotent() {
        let mut input = inputs(dec!(2000));
        input.volatility = dec!(0.002);
        input.macd_histogram = dec!(-1.5);
        input.inventory_penalty = dec!(0.25);
        let config = QuoteConfig::default();
        // Identical inputs give identical decisions, timestamp included
        let a = compose_quotes(&input, &config).unwrap();
        let b = compose_quotes(&input, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_volatility_monotonicity() {
        // Holding trend and inventory fixed, more volatility never
        // narrows either side.
        let config = QuoteConfig::default();
        let mut prev_bid = Decimal::ZERO;
        let mut prev_ask = Decimal::ZERO;
        for v in [dec!(0), dec!(0.001), dec!(0.005), dec!(0.02)] {
            let mut input = inputs(dec!(2000));
            input.volatility = v;
            input.macd_histogram = dec!(2);
            input.inventory_penalty = dec!(0.3);
            let decision = compose_quotes(&input, &config).unwrap();
            assert!(decision.half_spread_bid >= prev_bid);
            assert!(decision.half_spread_ask >= prev_ask);
            prev_bid = decision.half_spread_bid;
            prev_ask = decision.half_spread_ask;
        }
    }

    #[test]
    fn test_uptrend_narrows_bid_widens_ask() {
        let mut input = inputs(dec!(2000));
        input.macd_histogram = dec!(2); // 10 bps of mid, half saturation
        let decision = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert!(decision.half_spread_bid < dec!(0.001));
        assert!(decision.half_spread_ask > dec!(0.001));
    }

    #[test]
    fn test_overweight_base_widens_bid_narrows_ask() {
        // Fully overweight base asset: phi = +1
        let balanced = compose_quotes(&inputs(dec!(2000)), &QuoteConfig::default()).unwrap();
        let mut input = inputs(dec!(2000));
        input.inventory_penalty = dec!(1);
        let skewed = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert!(skewed.half_spread_bid > balanced.half_spread_bid);
        assert!(skewed.half_spread_ask < balanced.half_spread_ask);
    }

    #[test]
    fn test_phi_clamped() {
        let mut a = inputs(dec!(2000));
        a.inventory_penalty = dec!(1);
        let mut b = inputs(dec!(2000));
        b.inventory_penalty = dec!(5); // out of range, clamped
        let config = QuoteConfig::default();
        assert_eq!(
            compose_quotes(&a, &config).unwrap().bid_price,
            compose_quotes(&b, &config).unwrap().bid_price
        );
    }

    #[test]
    fn test_trend_normalization_saturates() {
        let config = QuoteConfig::default();
        let mut a = inputs(dec!(2000));
        a.macd_histogram = dec!(4); // exactly 20 bps of mid
        let mut b = inputs(dec!(2000));
        b.macd_histogram = dec!(400); // far past saturation
        assert_eq!(
            compose_quotes(&a, &config).unwrap().half_spread_ask,
            compose_quotes(&b, &config).unwrap().half_spread_ask
        );
    }

    #[test]
    fn test_crossing_bid_pushed_outside() {
        // Mid 2004 with a 10 bps half-spread computes bid just under 2002,
        // but the book's best bid is 2001: push to one tick below it.
        let mut input = inputs(dec!(2004));
        input.top = TopOfBook::new(Price::new(dec!(2001)), Price::new(dec!(2007)));
        let decision = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert!(decision.bid_price.inner() <= dec!(2001));
        assert_eq!(decision.bid_price.inner(), dec!(2000.99));
        // Ask side is unaffected and the decision remains valid
        assert!(decision.ask_price.inner() >= dec!(2007) || decision.ask_price > decision.mid_price);
    }

    #[test]
    fn test_crossing_guarantee_both_sides() {
        // Book wider than the configured spread: both quotes would sit
        // inside its top and must be pushed outside.
        let mut input = inputs(dec!(2000));
        input.top = TopOfBook::new(Price::new(dec!(1990)), Price::new(dec!(2010)));
        let decision = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert!(decision.bid_price.inner() <= dec!(1990));
        assert!(decision.ask_price.inner() >= dec!(2010));
        assert!(decision.bid_price < decision.ask_price);
    }

    #[test]
    fn test_tied_quote_is_adjusted() {
        // A quote exactly at the top of book ties it and is still moved out
        let mut input = inputs(dec!(2000));
        input.top = TopOfBook::new(Price::new(dec!(1998.000)), Price::new(dec!(2002.000)));
        let decision = compose_quotes(&input, &QuoteConfig::default()).unwrap();
        assert_eq!(decision.bid_price.inner(), dec!(1997.99));
        assert_eq!(decision.ask_price.inner(), dec!(2002.01));
    }

    #[test]
    fn test_invalid_quote_on_penny_book() {
        // A best bid below one tick pushes the adjusted bid to a
        // non-positive price, which must be rejected
        let mut input = inputs(dec!(2000));
        input.top = TopOfBook::new(Price::new(dec!(0.005)), Price::new(dec!(2000.1)));
        let err = compose_quotes(&input, &QuoteConfig::default()).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidQuote { .. }));
    }

    #[test]
    fn test_non_positive_mid_rejected() {
        let mut input = inputs(dec!(2000));
        input.mid = Price::ZERO;
        let err = compose_quotes(&input, &QuoteConfig::default()).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidQuote { .. }));
    }
}
