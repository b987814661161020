//! Inventory penalty calculation.
//!
//! Normalizes the current position into a bounded penalty factor
//! phi in [-1, 1] expressing how far the base-asset share of portfolio
//! value deviates from its target. Positive phi = overweight base asset,
//! biasing the composer to sell more aggressively and buy less.

use crate::error::{QuoteError, Result};
use pmm_core::{Balances, Price};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Maps balances to the inventory penalty phi.
#[derive(Debug, Clone, Copy)]
pub struct InventoryModel {
    /// Target share of portfolio value held in the base asset.
    target_base_ratio: Decimal,
}

impl InventoryModel {
    pub fn new(target_base_ratio: Decimal) -> Self {
        Self { target_base_ratio }
    }

    /// Compute phi in [-1, 1] from current balances at the given mid price.
    ///
    /// The share deviation is clamped to [-0.5, 0.5] and rescaled, so a
    /// deviation of half the portfolio or more saturates the penalty.
    /// Fails with `DegenerateInventory` when portfolio value is <= 0.
    pub fn penalty(&self, balances: &Balances, mid: Price) -> Result<Decimal> {
        let portfolio_value = balances.portfolio_value(mid);
        if portfolio_value <= Decimal::ZERO {
            return Err(QuoteError::DegenerateInventory {
                portfolio_value,
                mid: mid.inner(),
            });
        }

        let base_share = balances.base * mid.inner() / portfolio_value;
        let imbalance = (base_share - self.target_base_ratio)
            .max(dec!(-0.5))
            .min(dec!(0.5));
        Ok(imbalance * Decimal::TWO)
    }
}
