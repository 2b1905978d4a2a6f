//! Market Sync - warehouse stock & price uploader
//!
//! Downloads the supplier stock feed and pushes stock counts and prices to
//! Ozon and Yandex Market through their seller APIs, one channel at a time.

pub mod config;
pub mod error;
pub mod feed;
pub mod ozon;
pub mod reconcile;
pub mod sync;
pub mod yandex;

pub use config::Config;
pub use error::{Error, FailureKind, Result};
pub use feed::{FeedRecord, StockFeed};
pub use reconcile::{build_plan, SyncPlan};
