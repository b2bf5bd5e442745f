pub mod http_price_feed;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::price_table::PriceTable;

#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch(&self) -> Result<PriceTable>;
}

pub type DynamicPriceFeed = Arc<dyn PriceFeed>;
