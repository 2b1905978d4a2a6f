//! Market Sync - one-shot warehouse-to-marketplace uploader
//!
//! Single invocation, no flags: loads credentials from the environment,
//! downloads the stock feed, and syncs every configured channel in turn.

use clap::Parser;
use market_sync::{sync, Config};

/// Syncs warehouse stock levels and prices to Ozon and Yandex Market
#[derive(Parser, Debug)]
#[command(name = "market_sync")]
#[command(version, about, long_about = None)]
struct Args {}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    Args::parse();
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Starting market_sync...");
    let failures = sync::run(&config).await;

    if failures > 0 {
        log::error!("Sync finished with {} failed channel(s)", failures);
        std::process::exit(1);
    }
    log::info!("Sync completed successfully.");
}
