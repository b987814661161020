//! Periodic quoting engine: wiring, venue abstraction, and cycle loop.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod paper;
pub mod venue;

pub use app::{Engine, EngineState};
pub use config::{AppConfig, PaperConfig};
pub use error::{AppError, AppResult};
pub use paper::{CandleFeed, PaperVenue};
pub use venue::{CandleSink, Venue, VenueError};
