use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::outlet::Outlet;

#[derive(Debug, Default)]
pub struct DryRunOutlet;

#[async_trait]
impl Outlet for DryRunOutlet {
    async fn power_on(&self) -> Result<()> {
        info!("dry run: outlet on");

        /* NOTE: nothing to be done, the plug is never contacted in a dry run */
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        info!("dry run: outlet off");
        Ok(())
    }
}
