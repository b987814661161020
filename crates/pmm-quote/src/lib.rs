//! Inventory model and quote composition.
//!
//! Turns the per-cycle signals into a concrete, sanity-checked pair of
//! limit prices:
//!
//! ```text
//! natr, macd histogram, balances ──► InventoryModel (phi)
//!                                     │
//!                                     ▼
//!                              compose_quotes ──► QuoteDecision
//! ```
//!
//! `compose_quotes` is a pure function: identical inputs give identical
//! output, and every decision satisfies bid < mid < ask with both
//! half-spreads at or above the configured floor.

pub mod composer;
pub mod config;
pub mod error;
pub mod inventory;

pub use composer::{compose_quotes, QuoteDecision, QuoteInputs};
pub use config::QuoteConfig;
pub use error::QuoteError;
pub use inventory::InventoryModel;
