//! Tests for the Yandex Market Partner API client (wiremock-backed).

use super::*;
use crate::config::{MarketCampaign, MarketConfig};
use crate::reconcile::{PricePoint, StockLevel};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CAMPAIGN: &str = "111";

fn client_for(server: &MockServer) -> MarketClient {
    let mut client = MarketClient::new(&MarketConfig {
        token: "market-token".to_string(),
        fbs: campaign(),
        dbs: campaign(),
    });
    client.base_url = server.uri();
    client
}

fn campaign() -> MarketCampaign {
    MarketCampaign {
        campaign_id: CAMPAIGN.to_string(),
        warehouse_id: "777".to_string(),
    }
}

fn page_body(skus: &[String], next_page_token: Option<&str>) -> Value {
    let entries: Vec<Value> = skus
        .iter()
        .map(|sku| json!({ "offer": { "shopSku": sku } }))
        .collect();
    let paging = match next_page_token {
        Some(token) => json!({ "nextPageToken": token }),
        None => json!({}),
    };
    json!({ "result": { "paging": paging, "offerMappingEntries": entries } })
}

fn numbered_skus(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("YM-{i}")).collect()
}

#[tokio::test]
async fn offer_ids_follows_page_tokens_until_exhaustion() {
    let server = MockServer::start().await;
    let pages = [
        (String::new(), numbered_skus(0..200), Some("t1")),
        ("t1".to_string(), numbered_skus(200..400), Some("t2")),
        ("t2".to_string(), numbered_skus(400..450), None),
    ];

    for (token, skus, next) in &pages {
        Mock::given(method("GET"))
            .and(path(format!("/campaigns/{CAMPAIGN}/offer-mapping-entries")))
            .and(query_param("page_token", token.as_str()))
            .and(query_param("limit", "200"))
            .and(header("Authorization", "Bearer market-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(skus, *next)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ids = client_for(&server).offer_ids(CAMPAIGN).await.unwrap();
    assert_eq!(ids.len(), 450);
    assert_eq!(ids[0], "YM-0");
    assert_eq!(ids[449], "YM-449");
}

#[tokio::test]
async fn offer_ids_treats_an_empty_token_as_the_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/campaigns/{CAMPAIGN}/offer-mapping-entries")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page_body(&numbered_skus(0..5), Some(""))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ids = client_for(&server).offer_ids(CAMPAIGN).await.unwrap();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn offer_ids_propagates_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/campaigns/{CAMPAIGN}/offer-mapping-entries")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client_for(&server).offer_ids(CAMPAIGN).await.unwrap_err();
    assert!(matches!(err, Error::Status(status) if status.as_u16() == 403));
}

#[tokio::test]
async fn upload_stocks_uses_put_and_batches_in_chunks_of_2000() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("/campaigns/{CAMPAIGN}/offers/stocks")))
        .and(header("Authorization", "Bearer market-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(2)
        .mount(&server)
        .await;

    let levels: Vec<StockLevel> = (0..2500)
        .map(|i| StockLevel {
            offer_id: format!("YM-{i}"),
            count: 1,
        })
        .collect();
    let skus = stock_updates(&levels, "777", "2024-01-15T10:00:00Z");

    client_for(&server)
        .upload_stocks(CAMPAIGN, &skus)
        .await
        .unwrap();
}

#[tokio::test]
async fn upload_prices_batches_in_chunks_of_500() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/campaigns/{CAMPAIGN}/offer-prices/updates")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
        .expect(3)
        .mount(&server)
        .await;

    let points: Vec<PricePoint> = (0..1200)
        .map(|i| PricePoint {
            offer_id: format!("YM-{i}"),
            value: 990,
        })
        .collect();
    let offers = price_updates(&points);

    client_for(&server)
        .upload_prices(CAMPAIGN, &offers)
        .await
        .unwrap();
}

#[test]
fn stock_updates_wrap_each_sku_in_a_single_fit_item() {
    let levels = vec![StockLevel {
        offer_id: "CA-100".to_string(),
        count: 100,
    }];
    let skus = stock_updates(&levels, "777", "2024-01-15T10:00:00Z");

    let wire = serde_json::to_value(&skus[0]).unwrap();
    assert_eq!(
        wire,
        json!({
            "sku": "CA-100",
            "warehouseId": "777",
            "items": [{
                "count": 100,
                "type": "FIT",
                "updatedAt": "2024-01-15T10:00:00Z",
            }],
        })
    );
}

#[test]
fn price_updates_carry_value_and_currency() {
    let points = vec![PricePoint {
        offer_id: "CA-100".to_string(),
        value: 5990,
    }];
    let offers = price_updates(&points);

    let wire = serde_json::to_value(&offers[0]).unwrap();
    assert_eq!(
        wire,
        json!({
            "id": "CA-100",
            "price": { "value": 5990, "currencyId": "RUR" },
        })
    );
}
