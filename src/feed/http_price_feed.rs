use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use url::Url;

use crate::feed::PriceFeed;
use crate::types::price_table::PriceTable;

/// Day-ahead prices served as a JSON object of `label -> entry`.
#[derive(Clone, Debug)]
pub struct HttpPriceFeed {
    http: reqwest::Client,
    url: Url,
}

impl HttpPriceFeed {
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self { http, url }
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn fetch(&self) -> Result<PriceTable> {
        tracing::debug!(url = %self.url, "requesting prices");

        let resp = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .context("price feed GET failed")?;

        let status = resp.status();
        let text = resp.text().await.context("read response body failed")?;

        if !status.is_success() {
            bail!("price feed http error {status}: {text}");
        }

        let table: PriceTable = match serde_json::from_str(&text) {
            Ok(table) => table,
            Err(e) => {
                tracing::debug!(error = %e, %text, "failed to parse price feed JSON response");
                bail!("parse price feed JSON failed: {e}");
            }
        };

        if table.is_empty() {
            tracing::warn!("price feed returned no slots");
        }
        tracing::info!(slots = table.len(), "prices fetched");
        Ok(table)
    }
}
