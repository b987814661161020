//! Error types for pmm-signal.

use thiserror::Error;

/// Indicator error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignalError {
    /// Not enough candle history to compute the indicator.
    ///
    /// Recoverable: wait for more candles to close.
    #[error("insufficient data: need {required} candles, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Indicator parameters that no amount of data can satisfy.
    #[error("invalid indicator parameters: {0}")]
    InvalidParameters(String),
}

/// Result type alias for indicator computations.
pub type Result<T> = std::result::Result<T, SignalError>;
