//! Paper trading venue with a synthetic candle feed.
//!
//! `PaperVenue` keeps balances, a simulated top of book, and an order
//! ledger in memory. `CandleFeed` drives it with a bounded random walk so
//! the engine can run end to end without an exchange connection.

use crate::config::PaperConfig;
use crate::venue::{CandleSink, Venue, VenueError};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use pmm_core::{Balances, Candle, OrderHandle, OrderId, OrderSide, Price, Size, TopOfBook};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

struct PaperState {
    balances: Balances,
    top: TopOfBook,
    orders: HashMap<OrderId, OrderHandle>,
    next_id: OrderId,
}

/// In-memory venue. Orders rest forever; fills are out of scope.
pub struct PaperVenue {
    state: RwLock<PaperState>,
}

impl PaperVenue {
    pub fn new(config: &PaperConfig) -> Self {
        let top = book_around(Price::new(config.start_price), config.book_spread_bp);
        Self {
            state: RwLock::new(PaperState {
                balances: Balances::new(config.initial_base, config.initial_quote),
                top,
                orders: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Replace the simulated top of book. Called by the feed on each bar.
    pub fn set_top_of_book(&self, top: TopOfBook) {
        self.state.write().top = top;
    }

    /// Snapshot of currently resting orders.
    pub fn open_orders(&self) -> Vec<OrderHandle> {
        self.state.read().orders.values().copied().collect()
    }
}

#[async_trait]
impl Venue for PaperVenue {
    async fn balances(&self) -> Result<Balances, VenueError> {
        Ok(self.state.read().balances)
    }

    async fn top_of_book(&self) -> Result<TopOfBook, VenueError> {
        Ok(self.state.read().top)
    }

    async fn place_order(
        &self,
        side: OrderSide,
        price: Price,
        size: Size,
    ) -> Result<OrderHandle, VenueError> {
        if !price.is_positive() || !size.is_positive() {
            return Err(VenueError::OrderRejected {
                reason: format!("non-positive price {price} or size {size}"),
            });
        }
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;
        let handle = OrderHandle::new(id, side, price, size);
        state.orders.insert(id, handle);
        debug!(order_id = id, %side, %price, %size, "Paper order placed");
        Ok(handle)
    }

    async fn cancel_order(&self, id: OrderId) -> Result<(), VenueError> {
        let mut state = self.state.write();
        match state.orders.remove(&id) {
            Some(_) => {
                debug!(order_id = id, "Paper order cancelled");
                Ok(())
            }
            None => Err(VenueError::UnknownOrder(id)),
        }
    }
}

fn book_around(mid: Price, spread_bp: Decimal) -> TopOfBook {
    let half = mid.inner() * spread_bp / Decimal::from(20000);
    TopOfBook::new(Price::new(mid.inner() - half), Price::new(mid.inner() + half))
}

/// Generates closed candles on a fixed cadence from a bounded random walk
/// and keeps the paper book centered on the latest close.
pub struct CandleFeed {
    venue: Arc<PaperVenue>,
    sink: CandleSink,
    config: PaperConfig,
}

impl CandleFeed {
    pub fn new(venue: Arc<PaperVenue>, sink: CandleSink, config: PaperConfig) -> Self {
        Self {
            venue,
            sink,
            config,
        }
    }

    /// Run the feed until the task is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut rng = StdRng::from_entropy();
            let mut last_close = Price::new(self.config.start_price);
            let mut interval =
                tokio::time::interval(Duration::from_secs(self.config.candle_interval_secs));
            info!(
                start_price = %last_close,
                interval_secs = self.config.candle_interval_secs,
                "Synthetic candle feed started"
            );

            loop {
                interval.tick().await;

                let step_bp = rng.gen_range(-self.config.max_step_bp..=self.config.max_step_bp);
                let open = last_close;
                let close = Price::new(
                    open.inner() * (Decimal::ONE + Decimal::new(step_bp, 0) / Decimal::from(10000)),
                );
                let high = open.max(close);
                let low = open.min(close);
                let volume = Size::new(Decimal::new(rng.gen_range(1..=500), 2));

                let candle = Candle::new(Utc::now(), open, high, low, close, volume);
                self.sink.on_candle_closed(candle);
                self.venue
                    .set_top_of_book(book_around(close, self.config.book_spread_bp));
                last_close = close;
            }
        })
    }
}
