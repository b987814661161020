//! Core domain types for the pmm quoting bot.
//!
//! This crate provides the fundamental types shared by the indicator,
//! quoting, and scheduling layers:
//! - `Price`, `Size`: precision-safe decimal newtypes
//! - `Candle`: a closed OHLCV bar
//! - `TopOfBook`, `Balances`: per-cycle market/account snapshots
//! - `OrderSide`, `OrderHandle`: order intents and venue-owned handles

pub mod decimal;
pub mod order;
pub mod types;

pub use decimal::{Price, Size};
pub use order::{OrderHandle, OrderId, OrderSide, OrderState};
pub use types::{Balances, Candle, TopOfBook};
