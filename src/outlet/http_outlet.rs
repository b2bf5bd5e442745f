use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use url::Url;

use crate::config::endpoint::join_path;
use crate::outlet::Outlet;

pub const DEFAULT_ON_PATH: &str = "encender";
pub const DEFAULT_OFF_PATH: &str = "apagar";

/// Smart plug switched with bodiless `POST <base>/<path>` requests.
#[derive(Clone, Debug)]
pub struct HttpOutlet {
    http: reqwest::Client,
    on_url: String,
    off_url: String,
}

impl HttpOutlet {
    pub fn new(http: reqwest::Client, base_url: &Url, on_path: &str, off_path: &str) -> Self {
        Self {
            http,
            on_url: join_path(base_url, on_path),
            off_url: join_path(base_url, off_path),
        }
    }

    async fn post(&self, url: &str, action: &'static str) -> Result<()> {
        tracing::debug!(%url, action, "sending outlet request");

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .with_context(|| format!("outlet {action} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("outlet {action} http error {status}: {text}");
        }

        tracing::info!(action, "outlet switched");
        Ok(())
    }
}

#[async_trait]
impl Outlet for HttpOutlet {
    async fn power_on(&self) -> Result<()> {
        self.post(&self.on_url, "on").await
    }

    async fn power_off(&self) -> Result<()> {
        self.post(&self.off_url, "off").await
    }
}
