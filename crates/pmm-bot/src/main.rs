//! Periodic market-making quote engine - entry point.

use anyhow::Result;
use clap::Parser;
use parking_lot::RwLock;
use pmm_bot::{AppConfig, CandleFeed, CandleSink, Engine, PaperVenue};
use pmm_signal::CandleBuffer;
use std::sync::Arc;
use tracing::info;

/// Periodic quoting engine: NATR volatility, MACD trend, inventory skew.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via PMM_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    pmm_bot::logging::init_logging("info,pmm=debug");

    info!("Starting pmm-bot v{}", env!("CARGO_PKG_VERSION"));

    let config = match args.config {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;
    info!(pair = %config.pair, "Configuration loaded");

    let buffer = Arc::new(RwLock::new(CandleBuffer::new(
        config.signal.buffer_capacity(),
    )));
    let venue = Arc::new(PaperVenue::new(&config.paper));

    let feed = CandleFeed::new(
        Arc::clone(&venue),
        CandleSink::new(Arc::clone(&buffer)),
        config.paper.clone(),
    );
    let feed_task = feed.spawn();

    let mut engine = Engine::new(config, venue, buffer);
    engine.run().await?;

    feed_task.abort();
    Ok(())
}
