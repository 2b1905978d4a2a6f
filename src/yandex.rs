//! Yandex Market Partner API client: catalog enumeration and batched
//! stock/price updates for one campaign at a time.

use crate::config::MarketConfig;
use crate::error::{Error, Result};
use crate::reconcile::{PricePoint, StockLevel};
use serde::{Deserialize, Serialize};
use serde_json::json;

const BASE_URL: &str = "https://api.partner.market.yandex.ru";

/// Page size for the offer-mapping-entries listing
const PAGE_LIMIT: usize = 200;
/// Max records per offers/stocks call
const STOCK_BATCH: usize = 2000;
/// Max records per offer-prices/updates call
const PRICE_BATCH: usize = 500;

/// Stock state of one SKU in one warehouse.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkuStocks {
    pub sku: String,
    pub warehouse_id: String,
    pub items: Vec<StockItem>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub updated_at: String,
}

/// One price record for offer-prices/updates.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct OfferPrice {
    pub id: String,
    pub price: PriceValue,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceValue {
    pub value: u64,
    pub currency_id: String,
}

#[derive(Debug, Deserialize)]
struct OfferMappingResponse {
    result: OfferMappingPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferMappingPage {
    #[serde(default)]
    paging: Paging,
    #[serde(default)]
    offer_mapping_entries: Vec<OfferMappingEntry>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct Paging {
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OfferMappingEntry {
    offer: OfferInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferInfo {
    shop_sku: String,
}

/// Yandex Market Partner API client; campaigns are passed per call.
pub struct MarketClient {
    client: reqwest::Client,
    pub(crate) base_url: String,
    token: String,
}

impl MarketClient {
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            token: config.token.clone(),
        }
    }

    /// Fetch one catalog page; `page_token` is empty for the first page.
    async fn offer_mapping_page(
        &self,
        campaign_id: &str,
        page_token: &str,
    ) -> Result<OfferMappingPage> {
        let url = format!(
            "{}/campaigns/{}/offer-mapping-entries",
            self.base_url, campaign_id
        );
        let limit = PAGE_LIMIT.to_string();
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("page_token", page_token), ("limit", limit.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body: OfferMappingResponse = response.json().await?;
        Ok(body.result)
    }

    /// Enumerate every shop SKU in the campaign's catalog.
    ///
    /// Pages until the API stops handing out a next-page token.
    pub async fn offer_ids(&self, campaign_id: &str) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut page_token = String::new();

        loop {
            let page = self.offer_mapping_page(campaign_id, &page_token).await?;
            log::debug!(
                "Market catalog page: {} entries",
                page.offer_mapping_entries.len()
            );
            offer_ids.extend(
                page.offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );

            match page.paging.next_page_token {
                Some(token) if !token.is_empty() => page_token = token,
                _ => break,
            }
        }

        Ok(offer_ids)
    }

    async fn update_stocks(&self, campaign_id: &str, skus: &[SkuStocks]) -> Result<()> {
        let url = format!("{}/campaigns/{}/offers/stocks", self.base_url, campaign_id);
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .json(&json!({ "skus": skus }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    async fn update_prices(&self, campaign_id: &str, offers: &[OfferPrice]) -> Result<()> {
        let url = format!(
            "{}/campaigns/{}/offer-prices/updates",
            self.base_url, campaign_id
        );
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&json!({ "offers": offers }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    /// Push stock updates in chunks of at most 2000, sequentially and in order.
    ///
    /// A failing chunk aborts the remaining ones.
    pub async fn upload_stocks(&self, campaign_id: &str, skus: &[SkuStocks]) -> Result<()> {
        let total = skus.len().div_ceil(STOCK_BATCH);
        for (index, chunk) in skus.chunks(STOCK_BATCH).enumerate() {
            self.update_stocks(campaign_id, chunk).await?;
            log::info!(
                "Market stocks ({}): uploaded chunk {}/{} ({} records)",
                campaign_id,
                index + 1,
                total,
                chunk.len()
            );
        }
        Ok(())
    }

    /// Push price updates in chunks of at most 500, sequentially and in order.
    pub async fn upload_prices(&self, campaign_id: &str, offers: &[OfferPrice]) -> Result<()> {
        let total = offers.len().div_ceil(PRICE_BATCH);
        for (index, chunk) in offers.chunks(PRICE_BATCH).enumerate() {
            self.update_prices(campaign_id, chunk).await?;
            log::info!(
                "Market prices ({}): uploaded chunk {}/{} ({} records)",
                campaign_id,
                index + 1,
                total,
                chunk.len()
            );
        }
        Ok(())
    }
}

/// Map reconciled stock levels onto the Market wire format.
///
/// `updated_at` is the run timestamp; the API wants it per item.
pub fn stock_updates(levels: &[StockLevel], warehouse_id: &str, updated_at: &str) -> Vec<SkuStocks> {
    levels
        .iter()
        .map(|level| SkuStocks {
            sku: level.offer_id.clone(),
            warehouse_id: warehouse_id.to_string(),
            items: vec![StockItem {
                count: level.count,
                kind: "FIT".to_string(),
                updated_at: updated_at.to_string(),
            }],
        })
        .collect()
}

/// Map reconciled prices onto the Market wire format.
pub fn price_updates(points: &[PricePoint]) -> Vec<OfferPrice> {
    points
        .iter()
        .map(|point| OfferPrice {
            id: point.offer_id.clone(),
            price: PriceValue {
                value: point.value,
                currency_id: "RUR".to_string(),
            },
        })
        .collect()
}

#[cfg(test)]
#[path = "yandex_tests.rs"]
mod tests;
