//! Process configuration loaded once at startup from the environment.

use crate::error::{Error, Result};
use std::env;

/// Credentials for the Ozon Seller API.
#[derive(Debug, Clone)]
pub struct OzonConfig {
    /// Shop owner identifier (`Client-Id` header)
    pub client_id: String,
    /// Seller API key (`Api-Key` header)
    pub api_key: String,
}

/// One Yandex Market campaign (shop) plus the warehouse its stocks belong to.
#[derive(Debug, Clone)]
pub struct MarketCampaign {
    pub campaign_id: String,
    pub warehouse_id: String,
}

/// Credentials and campaigns for the Yandex Market Partner API.
///
/// FBS and DBS are the two fulfillment modes; each has its own campaign
/// and warehouse identifier but shares the API token.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub token: String,
    pub fbs: MarketCampaign,
    pub dbs: MarketCampaign,
}

/// Everything the sync run needs, assembled once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub ozon: OzonConfig,
    pub market: MarketConfig,
}

impl Config {
    /// Read all required settings from the environment.
    ///
    /// Any missing variable is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            ozon: OzonConfig {
                client_id: var("CLIENT_ID")?,
                api_key: var("SELLER_TOKEN")?,
            },
            market: MarketConfig {
                token: var("MARKET_TOKEN")?,
                fbs: MarketCampaign {
                    campaign_id: var("FBS_ID")?,
                    warehouse_id: var("WAREHOUSE_FBS_ID")?,
                },
                dbs: MarketCampaign {
                    campaign_id: var("DBS_ID")?,
                    warehouse_id: var("WAREHOUSE_DBS_ID")?,
                },
            },
        })
    }
}

fn var(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}
