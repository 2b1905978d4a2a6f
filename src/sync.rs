//! Orchestrates one sync run across all configured channels.
//!
//! Channels run in sequence and independently: a failure in one is
//! classified, logged as a one-line diagnostic, and the next channel
//! still gets its turn. The caller learns how many channels failed.

use crate::config::{Config, MarketCampaign, MarketConfig};
use crate::error::{Error, FailureKind, Result};
use crate::feed::{FeedRecord, StockFeed};
use crate::ozon::{self, OzonClient};
use crate::reconcile::build_plan;
use crate::yandex::{self, MarketClient};
use chrono::Utc;

/// Run a full sync: Ozon, then Yandex Market FBS, then DBS.
///
/// The warehouse snapshot is downloaded once and shared read-only by all
/// channels; without it nothing can run, so a feed failure fails the run.
/// Returns the number of channels that failed.
pub async fn run(config: &Config) -> usize {
    let records = match StockFeed::new().fetch().await {
        Ok(records) => records,
        Err(err) => {
            report_failure("stock feed", &err);
            return 1;
        }
    };

    let ozon = OzonClient::new(&config.ozon);
    let market = MarketClient::new(&config.market);
    sync_channels(&ozon, &market, &config.market, &records).await
}

/// Sync every channel in sequence against the given clients.
///
/// Returns the number of channels that failed.
pub(crate) async fn sync_channels(
    ozon: &OzonClient,
    market: &MarketClient,
    campaigns: &MarketConfig,
    records: &[FeedRecord],
) -> usize {
    let mut failures = 0;

    if let Err(err) = sync_ozon(ozon, records).await {
        report_failure("ozon", &err);
        failures += 1;
    }

    // One timestamp per run; both campaigns report the same snapshot.
    let updated_at = run_timestamp();
    let channels = [
        ("market fbs", &campaigns.fbs),
        ("market dbs", &campaigns.dbs),
    ];
    for (label, campaign) in channels {
        if let Err(err) = sync_market_campaign(market, campaign, records, &updated_at).await {
            report_failure(label, &err);
            failures += 1;
        }
    }

    failures
}

/// Sync the Ozon channel: enumerate, reconcile, upload stocks then prices.
async fn sync_ozon(client: &OzonClient, records: &[FeedRecord]) -> Result<()> {
    let offer_ids = client.offer_ids().await?;
    log::info!("Ozon catalog: {} offers", offer_ids.len());

    let plan = build_plan(records, &offer_ids)?;
    log::info!(
        "Ozon plan: {} stock updates, {} price updates",
        plan.stocks.len(),
        plan.prices.len()
    );

    client.upload_stocks(&ozon::stock_updates(&plan.stocks)).await?;
    client.upload_prices(&ozon::price_updates(&plan.prices)).await?;
    Ok(())
}

/// Sync one Yandex Market campaign.
async fn sync_market_campaign(
    client: &MarketClient,
    campaign: &MarketCampaign,
    records: &[FeedRecord],
    updated_at: &str,
) -> Result<()> {
    let offer_ids = client.offer_ids(&campaign.campaign_id).await?;
    log::info!(
        "Market catalog ({}): {} offers",
        campaign.campaign_id,
        offer_ids.len()
    );

    let plan = build_plan(records, &offer_ids)?;
    log::info!(
        "Market plan ({}): {} stock updates, {} price updates",
        campaign.campaign_id,
        plan.stocks.len(),
        plan.prices.len()
    );

    let skus = yandex::stock_updates(&plan.stocks, &campaign.warehouse_id, updated_at);
    client.upload_stocks(&campaign.campaign_id, &skus).await?;

    let offers = yandex::price_updates(&plan.prices);
    client.upload_prices(&campaign.campaign_id, &offers).await?;
    Ok(())
}

/// Stock timestamp for the Market API: UTC, whole seconds, Z suffix.
fn run_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

fn report_failure(channel: &str, err: &Error) {
    match err.failure_kind() {
        FailureKind::Timeout => log::error!("{channel}: request timed out: {err}"),
        FailureKind::Connection => log::error!("{channel}: connection failed: {err}"),
        FailureKind::Other => log::error!("{channel}: sync failed: {err}"),
    }
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
