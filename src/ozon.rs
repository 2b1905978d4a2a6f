//! Ozon Seller API client: catalog enumeration and batched stock/price updates.

use crate::config::OzonConfig;
use crate::error::{Error, Result};
use crate::reconcile::{PricePoint, StockLevel};
use serde::{Deserialize, Serialize};
use serde_json::json;

const BASE_URL: &str = "https://api-seller.ozon.ru";

/// Page size for /v2/product/list
const PAGE_LIMIT: usize = 1000;
/// Max records per /v1/product/import/stocks call
const STOCK_BATCH: usize = 100;
/// Max records per /v1/product/import/prices call
const PRICE_BATCH: usize = 900;

/// One stock record for /v1/product/import/stocks
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct StockUpdate {
    pub offer_id: String,
    pub stock: u32,
}

/// One price record for /v1/product/import/prices
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct PriceUpdate {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    result: ProductListPage,
}

#[derive(Debug, Deserialize)]
struct ProductListPage {
    items: Vec<ProductListItem>,
    last_id: String,
    total: usize,
}

#[derive(Debug, Deserialize)]
struct ProductListItem {
    offer_id: String,
}

/// Ozon Seller API client for one shop.
pub struct OzonClient {
    client: reqwest::Client,
    pub(crate) base_url: String,
    client_id: String,
    api_key: String,
}

impl OzonClient {
    pub fn new(config: &OzonConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            client_id: config.client_id.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch one catalog page; `last_id` is empty for the first page.
    async fn product_page(&self, last_id: &str) -> Result<ProductListPage> {
        let response = self
            .client
            .post(format!("{}/v2/product/list", self.base_url))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&json!({
                "filter": { "visibility": "ALL" },
                "last_id": last_id,
                "limit": PAGE_LIMIT,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body: ProductListResponse = response.json().await?;
        Ok(body.result)
    }

    /// Enumerate every offer id in the shop's catalog.
    ///
    /// Pages until the accumulated count reaches the total the API reports.
    pub async fn offer_ids(&self) -> Result<Vec<String>> {
        let mut offer_ids = Vec::new();
        let mut last_id = String::new();

        loop {
            let page = self.product_page(&last_id).await?;
            let received = page.items.len();
            offer_ids.extend(page.items.into_iter().map(|item| item.offer_id));
            log::debug!("Ozon catalog page: {} items, {} total", received, page.total);

            if offer_ids.len() >= page.total {
                break;
            }
            if received == 0 {
                log::warn!(
                    "Ozon catalog page came back empty at {} of {} items",
                    offer_ids.len(),
                    page.total
                );
                break;
            }
            last_id = page.last_id;
        }

        Ok(offer_ids)
    }

    async fn update_stocks(&self, stocks: &[StockUpdate]) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/v1/product/import/stocks", self.base_url))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&json!({ "stocks": stocks }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    async fn update_prices(&self, prices: &[PriceUpdate]) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/v1/product/import/prices", self.base_url))
            .header("Client-Id", &self.client_id)
            .header("Api-Key", &self.api_key)
            .json(&json!({ "prices": prices }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }
        Ok(())
    }

    /// Push stock updates in chunks of at most 100, sequentially and in order.
    ///
    /// A failing chunk aborts the remaining ones.
    pub async fn upload_stocks(&self, stocks: &[StockUpdate]) -> Result<()> {
        let total = stocks.len().div_ceil(STOCK_BATCH);
        for (index, chunk) in stocks.chunks(STOCK_BATCH).enumerate() {
            self.update_stocks(chunk).await?;
            log::info!(
                "Ozon stocks: uploaded chunk {}/{} ({} records)",
                index + 1,
                total,
                chunk.len()
            );
        }
        Ok(())
    }

    /// Push price updates in chunks of at most 900, sequentially and in order.
    pub async fn upload_prices(&self, prices: &[PriceUpdate]) -> Result<()> {
        let total = prices.len().div_ceil(PRICE_BATCH);
        for (index, chunk) in prices.chunks(PRICE_BATCH).enumerate() {
            self.update_prices(chunk).await?;
            log::info!(
                "Ozon prices: uploaded chunk {}/{} ({} records)",
                index + 1,
                total,
                chunk.len()
            );
        }
        Ok(())
    }
}

/// Map reconciled stock levels onto the Ozon wire format.
pub fn stock_updates(levels: &[StockLevel]) -> Vec<StockUpdate> {
    levels
        .iter()
        .map(|level| StockUpdate {
            offer_id: level.offer_id.clone(),
            stock: level.count,
        })
        .collect()
}

/// Map reconciled prices onto the Ozon wire format.
pub fn price_updates(points: &[PricePoint]) -> Vec<PriceUpdate> {
    points
        .iter()
        .map(|point| PriceUpdate {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: "RUB".to_string(),
            offer_id: point.offer_id.clone(),
            old_price: "0".to_string(),
            price: point.value.to_string(),
        })
        .collect()
}

#[cfg(test)]
#[path = "ozon_tests.rs"]
mod tests;
