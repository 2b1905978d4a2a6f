//! Reconciles the warehouse feed against a channel's catalog.
//!
//! Produces platform-neutral stock and price collections; the `ozon` and
//! `yandex` modules map them onto their wire formats.

use crate::error::{Error, Result};
use crate::feed::FeedRecord;
use std::collections::HashSet;

/// Stock count for one catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockLevel {
    pub offer_id: String,
    pub count: u32,
}

/// Normalized price for one catalog identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePoint {
    pub offer_id: String,
    pub value: u64,
}

/// The derived update collections for one channel.
#[derive(Debug, Default)]
pub struct SyncPlan {
    pub stocks: Vec<StockLevel>,
    pub prices: Vec<PricePoint>,
}

/// Build the update plan for one channel.
///
/// Feed rows whose code matches a catalog identifier emit a stock record
/// (bucketed quantity) and a price record, in feed order; each identifier
/// is consumed at most once. Every identifier left unmatched then emits a
/// zero stock record, in catalog order, and no price record. The stock
/// collection therefore contains exactly one entry per catalog identifier.
pub fn build_plan(records: &[FeedRecord], offer_ids: &[String]) -> Result<SyncPlan> {
    let mut remaining: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();
    let mut plan = SyncPlan::default();

    for record in records {
        if !remaining.remove(record.code.as_str()) {
            continue;
        }
        let count = bucket_quantity(&record.quantity).ok_or_else(|| Error::Quantity {
            code: record.code.clone(),
            value: record.quantity.clone(),
        })?;
        plan.stocks.push(StockLevel {
            offer_id: record.code.clone(),
            count,
        });

        let digits = normalize_price(&record.price);
        let value = digits.parse::<u64>().map_err(|_| Error::Price {
            code: record.code.clone(),
            value: record.price.clone(),
        })?;
        plan.prices.push(PricePoint {
            offer_id: record.code.clone(),
            value,
        });
    }

    // Whatever the feed did not cover is treated as out of stock.
    for offer_id in offer_ids {
        if remaining.contains(offer_id.as_str()) {
            plan.stocks.push(StockLevel {
                offer_id: offer_id.clone(),
                count: 0,
            });
        }
    }

    Ok(plan)
}

/// Map a raw feed quantity onto a stock count.
///
/// The supplier reports ">10" for well-stocked items and "1" for display
/// pieces that are not actually sellable; everything else is a plain count.
pub fn bucket_quantity(raw: &str) -> Option<u32> {
    match raw.trim() {
        ">10" => Some(100),
        "1" => Some(0),
        other => other.parse().ok(),
    }
}

/// Strip a human-formatted feed price down to its digits.
///
/// Drops everything from the first "." on (kopecks and currency text),
/// then every remaining non-digit, so "5'990.00 руб." becomes "5990".
/// A textual rule for this feed format, not a locale-aware parse.
pub fn normalize_price(raw: &str) -> String {
    let whole = raw.split('.').next().unwrap_or("");
    whole.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
