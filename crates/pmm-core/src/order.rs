//! Order-related types.
//!
//! The quoting engine issues place/cancel intents and reasons about the
//! set of currently outstanding handles. Order lifecycle beyond that
//! (acknowledgement, fills) is owned by the venue.

use crate::{Price, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Venue-assigned order identifier.
pub type OrderId = u64;

/// Order side: buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    /// Returns 1 for buy, -1 for sell (for position calculations).
    pub fn sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// Lifecycle state of a venue order, as last reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    /// Resting on the book (or submitted and presumed resting).
    #[default]
    Open,
    /// Cancel intent issued.
    Cancelled,
    /// Fully filled.
    Filled,
}

/// Handle to an order resting at the venue.
///
/// Created by `Venue::place_order`; the engine keeps these only to decide
/// which outstanding quotes to cancel on the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderHandle {
    /// Venue-assigned order ID.
    pub id: OrderId,
    /// Order side.
    pub side: OrderSide,
    /// Limit price.
    pub price: Price,
    /// Order size.
    pub size: Size,
    /// Last known state.
    pub state: OrderState,
}

impl OrderHandle {
    pub fn new(id: OrderId, side: OrderSide, price: Price, size: Size) -> Self {
        Self {
            id,
            side,
            price,
            size,
            state: OrderState::Open,
        }
    }
}
