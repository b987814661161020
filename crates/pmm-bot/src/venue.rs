//! Venue abstraction and candle ingestion.
//!
//! `Venue` is the seam between the decision engine and the exchange:
//! account state, top of book, and order placement/cancellation. The
//! engine only ever talks to a venue through this trait, which keeps the
//! cycle logic testable against a scripted implementation.

use async_trait::async_trait;
use parking_lot::RwLock;
use pmm_core::{Balances, Candle, OrderHandle, OrderId, OrderSide, Price, Size, TopOfBook};
use pmm_signal::CandleBuffer;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Venue-side failures. All recoverable at the cycle level.
#[derive(Debug, Clone, Error)]
pub enum VenueError {
    #[error("venue unavailable: {0}")]
    Unavailable(String),

    /// The book is one-sided or crossed; no usable mid price.
    #[error("invalid book: bid {best_bid} / ask {best_ask}")]
    InvalidBook { best_bid: Price, best_ask: Price },

    #[error("order rejected: {reason}")]
    OrderRejected { reason: String },

    #[error("unknown order id {0}")]
    UnknownOrder(OrderId),
}

/// Exchange-facing operations polled or invoked once per decision cycle.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Current base and quote balances.
    async fn balances(&self) -> Result<Balances, VenueError>;

    /// Current best bid and ask.
    async fn top_of_book(&self) -> Result<TopOfBook, VenueError>;

    /// Place a limit order, returning the venue-assigned handle.
    async fn place_order(
        &self,
        side: OrderSide,
        price: Price,
        size: Size,
    ) -> Result<OrderHandle, VenueError>;

    /// Cancel a resting order by id.
    async fn cancel_order(&self, id: OrderId) -> Result<(), VenueError>;
}

/// Receives closed candles from the market data feed and appends them to
/// the shared history buffer. Out-of-order bars are dropped, not applied.
#[derive(Clone)]
pub struct CandleSink {
    buffer: Arc<RwLock<CandleBuffer>>,
}

impl CandleSink {
    pub fn new(buffer: Arc<RwLock<CandleBuffer>>) -> Self {
        Self { buffer }
    }

    /// Append a closed candle. Returns false if the bar was stale.
    pub fn on_candle_closed(&self, candle: Candle) -> bool {
        let accepted = self.buffer.write().push(candle);
        if accepted {
            debug!(
                open_time = %candle.open_time,
                close = %candle.close,
                "Candle appended"
            );
        } else {
            warn!(
                open_time = %candle.open_time,
                "Dropping out-of-order candle"
            );
        }
        accepted
    }
}
