//! Application error types.

use crate::venue::VenueError;
use pmm_quote::QuoteError;
use pmm_signal::SignalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("{collaborator} did not respond within {timeout_ms}ms")]
    CollaboratorTimeout {
        collaborator: &'static str,
        timeout_ms: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
