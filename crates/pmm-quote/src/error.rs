//! Error types for pmm-quote.

use rust_decimal::Decimal;
use thiserror::Error;

/// Quoting error types. All recoverable: the caller skips the cycle and
/// keeps its previous orders.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteError {
    /// Portfolio value is zero or negative; the inventory share is undefined.
    #[error("degenerate inventory: portfolio value {portfolio_value} at mid {mid}")]
    DegenerateInventory { portfolio_value: Decimal, mid: Decimal },

    /// Composed bid ended up at or above the ask after book adjustment.
    #[error("invalid quote: bid {bid} >= ask {ask} after adjustment")]
    InvalidQuote { bid: Decimal, ask: Decimal },
}

/// Result type alias for quoting operations.
pub type Result<T> = std::result::Result<T, QuoteError>;
