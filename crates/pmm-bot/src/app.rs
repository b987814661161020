//! Decision cycle orchestration.
//!
//! The engine wakes on a fixed cadence, snapshots the candle window,
//! polls the venue for balances and top of book, computes the NATR,
//! MACD, and inventory signals, composes a quote decision, and
//! reconciles the resting orders against it. Every failure is scoped
//! to the cycle: the previous quotes stay on the book and the next
//! tick starts fresh.

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};
use crate::venue::{Venue, VenueError};
use parking_lot::RwLock;
use pmm_core::{OrderHandle, OrderSide, Price};
use pmm_quote::{compose_quotes, InventoryModel, QuoteInputs};
use pmm_signal::{macd, natr, CandleBuffer};
use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Where the engine is within its cycle. `Error` is purely informational;
/// the next tick always restarts from `Computing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Waiting for the next tick.
    Idle,
    /// Gathering inputs and composing quotes.
    Computing,
    /// Applying cancel/replace operations at the venue.
    Reconciling,
    /// The last cycle failed; previous quotes were retained.
    Error,
}

/// Periodic quoting engine for a single pair.
pub struct Engine {
    config: AppConfig,
    venue: Arc<dyn Venue>,
    buffer: Arc<RwLock<CandleBuffer>>,
    inventory: InventoryModel,
    state: EngineState,
    bid: Option<OrderHandle>,
    ask: Option<OrderHandle>,
}

impl Engine {
    pub fn new(config: AppConfig, venue: Arc<dyn Venue>, buffer: Arc<RwLock<CandleBuffer>>) -> Self {
        let inventory = InventoryModel::new(config.quote.target_base_ratio);
        Self {
            config,
            venue,
            buffer,
            inventory,
            state: EngineState::Idle,
            bid: None,
            ask: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The bid and ask handles the engine believes are resting.
    pub fn open_quotes(&self) -> (Option<OrderHandle>, Option<OrderHandle>) {
        (self.bid, self.ask)
    }

    /// Run cycles until shutdown is requested.
    pub async fn run(&mut self) -> AppResult<()> {
        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.refresh_interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            pair = %self.config.pair,
            interval_secs = self.config.refresh_interval_secs,
            "Engine started"
        );

        // Armed once so a signal arriving while a tick is in flight is
        // not lost between select iterations.
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Failures are already logged and absorbed into the
                    // Error state; the loop keeps going.
                    let _ = self.tick().await;
                }
                _ = &mut ctrl_c => {
                    info!("Shutdown signal received");
                    self.shutdown().await;
                    return Ok(());
                }
            }
        }
    }

    /// Run one decision cycle and record its outcome in the engine state.
    pub async fn tick(&mut self) -> AppResult<()> {
        let result = self.run_cycle().await;
        match &result {
            Ok(()) => self.state = EngineState::Idle,
            Err(e) => {
                self.state = EngineState::Error;
                warn!(error = %e, "Cycle failed, retaining previous quotes");
            }
        }
        result
    }

    async fn run_cycle(&mut self) -> AppResult<()> {
        self.state = EngineState::Computing;

        // Snapshot once; candles closing mid-cycle are picked up next tick.
        let candles = self.buffer.read().snapshot();

        let venue = Arc::clone(&self.venue);
        let top = self
            .timed("top_of_book", venue.top_of_book())
            .await?;
        let mid = top.mid_price().ok_or(VenueError::InvalidBook {
            best_bid: top.best_bid,
            best_ask: top.best_ask,
        })?;

        let venue = Arc::clone(&self.venue);
        let balances = self.timed("balances", venue.balances()).await?;

        let volatility = natr(&candles, self.config.signal.candle_period)?;
        let closes: Vec<Decimal> = candles.iter().map(|c| c.close.inner()).collect();
        let trend = macd(
            &closes,
            self.config.signal.macd_fast,
            self.config.signal.macd_slow,
            self.config.signal.macd_signal,
        )?;
        let phi = self.inventory.penalty(&balances, mid)?;

        let decision = compose_quotes(
            &QuoteInputs {
                mid,
                volatility,
                macd_histogram: trend.histogram,
                inventory_penalty: phi,
                top,
                timestamp: top.received_at,
            },
            &self.config.quote,
        )?;

        self.state = EngineState::Reconciling;
        self.reconcile_side(OrderSide::Buy, decision.bid_price).await?;
        self.reconcile_side(OrderSide::Sell, decision.ask_price).await?;

        let bps = Decimal::from(10000);
        info!(
            mid = %decision.mid_price,
            bid = %decision.bid_price,
            ask = %decision.ask_price,
            half_spread_bid_bp = %(decision.half_spread_bid * bps),
            half_spread_ask_bp = %(decision.half_spread_ask * bps),
            natr = %volatility,
            macd_histogram = %trend.histogram,
            inventory_penalty = %phi,
            "Quotes refreshed"
        );
        Ok(())
    }

    /// Bring one side of the book in line with the freshly composed price.
    ///
    /// Handles are updated only after the venue confirms the operation, so
    /// a failure mid-way leaves the bookkeeping matching what actually
    /// rests on the book.
    async fn reconcile_side(&mut self, side: OrderSide, price: Price) -> AppResult<()> {
        let existing = match side {
            OrderSide::Buy => self.bid,
            OrderSide::Sell => self.ask,
        };

        if let Some(order) = existing {
            if self.within_tolerance(order.price, price) {
                debug!(%side, resting = %order.price, fresh = %price, "Keeping resting order");
                return Ok(());
            }
            let venue = Arc::clone(&self.venue);
            self.timed("cancel_order", venue.cancel_order(order.id)).await?;
            match side {
                OrderSide::Buy => self.bid = None,
                OrderSide::Sell => self.ask = None,
            }
        }

        let venue = Arc::clone(&self.venue);
        let handle = self
            .timed(
                "place_order",
                venue.place_order(side, price, self.config.order_size),
            )
            .await?;
        match side {
            OrderSide::Buy => self.bid = Some(handle),
            OrderSide::Sell => self.ask = Some(handle),
        }
        Ok(())
    }

    /// Whether a resting price is close enough to the fresh one to keep.
    /// A zero tolerance always replaces.
    fn within_tolerance(&self, resting: Price, fresh: Price) -> bool {
        if self.config.replace_tolerance_bp.is_zero() {
            return false;
        }
        match fresh.bps_from(resting) {
            Some(drift) => drift.abs() <= self.config.replace_tolerance_bp,
            None => false,
        }
    }

    /// Best-effort cancel of both resting quotes.
    async fn shutdown(&mut self) {
        for handle in [self.bid.take(), self.ask.take()].into_iter().flatten() {
            let venue = Arc::clone(&self.venue);
            match self.timed("cancel_order", venue.cancel_order(handle.id)).await {
                Ok(()) => info!(order_id = handle.id, "Cancelled on shutdown"),
                Err(e) => warn!(order_id = handle.id, error = %e, "Cancel failed on shutdown"),
            }
        }
    }

    async fn timed<T>(
        &self,
        collaborator: &'static str,
        fut: impl Future<Output = Result<T, VenueError>>,
    ) -> AppResult<T> {
        let timeout_ms = self.config.collaborator_timeout_ms;
        match timeout(Duration::from_millis(timeout_ms), fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::CollaboratorTimeout {
                collaborator,
                timeout_ms,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperVenue;
    use rust_decimal_macros::dec;

    fn engine_with_tolerance(tolerance_bp: Decimal) -> Engine {
        let config = AppConfig {
            replace_tolerance_bp: tolerance_bp,
            ..Default::default()
        };
        let buffer = Arc::new(RwLock::new(CandleBuffer::new(
            config.signal.buffer_capacity(),
        )));
        let venue = Arc::new(PaperVenue::new(&config.paper));
        Engine::new(config, venue, buffer)
    }

    #[test]
    fn test_zero_tolerance_always_replaces() {
        let engine = engine_with_tolerance(dec!(0));
        assert!(!engine.within_tolerance(Price::new(dec!(2000)), Price::new(dec!(2000))));
    }

    #[test]
    fn test_within_tolerance_keeps_close_prices() {
        let engine = engine_with_tolerance(dec!(5));
        // 2000 -> 2000.8 is 4 bps of drift
        assert!(engine.within_tolerance(Price::new(dec!(2000)), Price::new(dec!(2000.8))));
        // 2000 -> 2002 is 10 bps
        assert!(!engine.within_tolerance(Price::new(dec!(2000)), Price::new(dec!(2002))));
    }

    #[test]
    fn test_engine_starts_idle() {
        let engine = engine_with_tolerance(dec!(0));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.open_quotes(), (None, None));
    }
}
