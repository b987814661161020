//! Quoting configuration.

use pmm_core::Price;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for inventory penalty and quote composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// Baseline half-spread in basis points, before volatility widening.
    #[serde(default = "default_base_spread_bp")]
    pub base_spread_bp: Decimal,

    /// Floor for each half-spread in basis points.
    #[serde(default = "default_min_spread_bp")]
    pub min_spread_bp: Decimal,

    /// Half-spread widening per unit of NATR. Volatility only ever widens
    /// the baseline, never narrows it.
    #[serde(default = "default_vol_multiplier")]
    pub vol_multiplier: Decimal,

    /// Half-spread shift per unit of normalized MACD histogram.
    #[serde(default = "default_trend_multiplier")]
    pub trend_multiplier: Decimal,

    /// Half-spread shift per unit of inventory penalty phi.
    #[serde(default = "default_inventory_multiplier")]
    pub inventory_multiplier: Decimal,

    /// Histogram magnitude, in basis points of mid, that maps to a fully
    /// saturated trend signal (+/-1). Larger histograms are clamped.
    #[serde(default = "default_trend_norm_bp")]
    pub trend_norm_bp: Decimal,

    /// Target share of portfolio value held in the base asset.
    #[serde(default = "default_target_base_ratio")]
    pub target_base_ratio: Decimal,

    /// Minimum price increment of the venue. Used to push a crossing quote
    /// just outside the book.
    #[serde(default = "default_tick_size")]
    pub tick_size: Price,
}

impl QuoteConfig {
    /// Validate quoting parameters. Failures here are fatal at startup.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_spread_bp <= Decimal::ZERO {
            return Err(format!(
                "min_spread_bp must be positive, got {}",
                self.min_spread_bp
            ));
        }
        if self.base_spread_bp < Decimal::ZERO {
            return Err("base_spread_bp must not be negative".to_string());
        }
        if self.trend_norm_bp <= Decimal::ZERO {
            return Err("trend_norm_bp must be positive".to_string());
        }
        if self.target_base_ratio < Decimal::ZERO || self.target_base_ratio > Decimal::ONE {
            return Err(format!(
                "target_base_ratio must be within [0, 1], got {}",
                self.target_base_ratio
            ));
        }
        if !self.tick_size.is_positive() {
            return Err("tick_size must be positive".to_string());
        }
        if self.vol_multiplier < Decimal::ZERO {
            return Err("vol_multiplier must not be negative".to_string());
        }
        Ok(())
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            base_spread_bp: default_base_spread_bp(),
            min_spread_bp: default_min_spread_bp(),
            vol_multiplier: default_vol_multiplier(),
            trend_multiplier: default_trend_multiplier(),
            inventory_multiplier: default_inventory_multiplier(),
            trend_norm_bp: default_trend_norm_bp(),
            target_base_ratio: default_target_base_ratio(),
            tick_size: default_tick_size(),
        }
    }
}

fn default_base_spread_bp() -> Decimal {
    Decimal::new(10, 0) // 10 bps
}
fn default_min_spread_bp() -> Decimal {
    Decimal::ONE // 1 bp
}
fn default_vol_multiplier() -> Decimal {
    Decimal::ONE // full NATR added to the half-spread
}
fn default_trend_multiplier() -> Decimal {
    Decimal::new(5, 4) // 5 bps shift at full trend saturation
}
fn default_inventory_multiplier() -> Decimal {
    Decimal::new(5, 4) // 5 bps shift at full inventory penalty
}
fn default_trend_norm_bp() -> Decimal {
    Decimal::new(20, 0) // 20 bps of mid saturates the trend signal
}
fn default_target_base_ratio() -> Decimal {
    Decimal::new(5, 1) // 0.5
}
fn default_tick_size() -> Price {
    Price(Decimal::new(1, 2)) // 0.01
}
