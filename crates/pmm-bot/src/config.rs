//! Application configuration.

use crate::error::{AppError, AppResult};
use pmm_core::Size;
use pmm_quote::QuoteConfig;
use pmm_signal::IndicatorConfig;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Trading pair, e.g. "ETH-USDT".
    #[serde(default = "default_pair")]
    pub pair: String,

    /// Decision cycle cadence in seconds.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Size of each quoted order, in base asset units.
    #[serde(default = "default_order_size")]
    pub order_size: Size,

    /// Keep a resting order if the newly composed price is within this many
    /// basis points of it. Zero means cancel and replace every cycle.
    #[serde(default)]
    pub replace_tolerance_bp: Decimal,

    /// Timeout for each venue call within a cycle.
    #[serde(default = "default_collaborator_timeout_ms")]
    pub collaborator_timeout_ms: u64,

    /// Candle window and indicator parameters.
    #[serde(default)]
    pub signal: IndicatorConfig,

    /// Spread, skew, and inventory parameters.
    #[serde(default)]
    pub quote: QuoteConfig,

    /// Paper venue and synthetic feed parameters.
    #[serde(default)]
    pub paper: PaperConfig,
}

/// Paper trading venue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperConfig {
    /// Starting base asset balance.
    #[serde(default = "default_initial_base")]
    pub initial_base: Decimal,

    /// Starting quote asset balance.
    #[serde(default = "default_initial_quote")]
    pub initial_quote: Decimal,

    /// First price of the synthetic random walk.
    #[serde(default = "default_start_price")]
    pub start_price: Decimal,

    /// Maximum per-candle move of the walk, in basis points.
    #[serde(default = "default_max_step_bp")]
    pub max_step_bp: i64,

    /// Width of the simulated book, in basis points of mid.
    #[serde(default = "default_book_spread_bp")]
    pub book_spread_bp: Decimal,

    /// Candle close cadence of the synthetic feed, in seconds.
    #[serde(default = "default_candle_interval_secs")]
    pub candle_interval_secs: u64,
}

impl AppConfig {
    /// Load from `PMM_CONFIG` or the default path, falling back to built-in
    /// defaults when no file exists.
    pub fn load() -> AppResult<Self> {
        let config_path =
            std::env::var("PMM_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

        if Path::new(&config_path).exists() {
            Self::from_file(&config_path)
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))
    }

    /// Validate the whole configuration tree. Failures are fatal at startup.
    pub fn validate(&self) -> AppResult<()> {
        if self.pair.is_empty() {
            return Err(AppError::Config("pair must not be empty".to_string()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(AppError::Config(
                "refresh_interval_secs must be positive".to_string(),
            ));
        }
        if !self.order_size.is_positive() {
            return Err(AppError::Config(format!(
                "order_size must be positive, got {}",
                self.order_size
            )));
        }
        if self.replace_tolerance_bp < Decimal::ZERO {
            return Err(AppError::Config(
                "replace_tolerance_bp must not be negative".to_string(),
            ));
        }
        if self.collaborator_timeout_ms == 0 {
            return Err(AppError::Config(
                "collaborator_timeout_ms must be positive".to_string(),
            ));
        }
        self.signal.validate().map_err(AppError::Config)?;
        self.quote.validate().map_err(AppError::Config)?;
        self.paper.validate().map_err(AppError::Config)?;
        Ok(())
    }
}

impl PaperConfig {
    /// Validate paper venue parameters. The feed task trusts these, so a
    /// bad value must be caught here rather than panic mid-run.
    pub fn validate(&self) -> Result<(), String> {
        if self.start_price <= Decimal::ZERO {
            return Err(format!(
                "paper.start_price must be positive, got {}",
                self.start_price
            ));
        }
        if self.max_step_bp < 0 {
            return Err(format!(
                "paper.max_step_bp must not be negative, got {}",
                self.max_step_bp
            ));
        }
        if self.book_spread_bp <= Decimal::ZERO {
            return Err("paper.book_spread_bp must be positive".to_string());
        }
        if self.candle_interval_secs == 0 {
            return Err("paper.candle_interval_secs must be positive".to_string());
        }
        if self.initial_base < Decimal::ZERO || self.initial_quote < Decimal::ZERO {
            return Err("paper balances must not be negative".to_string());
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pair: default_pair(),
            refresh_interval_secs: default_refresh_interval_secs(),
            order_size: default_order_size(),
            replace_tolerance_bp: Decimal::ZERO,
            collaborator_timeout_ms: default_collaborator_timeout_ms(),
            signal: IndicatorConfig::default(),
            quote: QuoteConfig::default(),
            paper: PaperConfig::default(),
        }
    }
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            initial_base: default_initial_base(),
            initial_quote: default_initial_quote(),
            start_price: default_start_price(),
            max_step_bp: default_max_step_bp(),
            book_spread_bp: default_book_spread_bp(),
            candle_interval_secs: default_candle_interval_secs(),
        }
    }
}

fn default_pair() -> String {
    "ETH-USDT".to_string()
}
fn default_refresh_interval_secs() -> u64 {
    15
}
fn default_order_size() -> Size {
    Size(Decimal::new(1, 2)) // 0.01
}
fn default_collaborator_timeout_ms() -> u64 {
    2_000
}
fn default_initial_base() -> Decimal {
    Decimal::ONE
}
fn default_initial_quote() -> Decimal {
    Decimal::new(2000, 0)
}
fn default_start_price() -> Decimal {
    Decimal::new(2000, 0)
}
fn default_max_step_bp() -> i64 {
    15
}
fn default_book_spread_bp() -> Decimal {
    Decimal::new(4, 0)
}
fn default_candle_interval_secs() -> u64 {
    60
}
