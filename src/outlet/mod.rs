pub mod dry_run;
pub mod http_outlet;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// The controlled smart plug. Any error is a failed switch; the state of the
/// plug is not read back.
#[async_trait]
pub trait Outlet: Send + Sync {
    async fn power_on(&self) -> Result<()>;
    async fn power_off(&self) -> Result<()>;
}

pub type DynamicOutlet = Arc<dyn Outlet>;
