use std::sync::Arc;

use url::Url;

use crate::{
    outlet::{DynamicOutlet, dry_run::DryRunOutlet, http_outlet::HttpOutlet},
    scenario::outlets::OutletKind,
};

pub struct Scenario;

/// Where and how to reach the plug.
pub struct OutletTarget<'a> {
    pub base_url: &'a Url,
    pub on_path: &'a str,
    pub off_path: &'a str,
}

impl Scenario {
    pub fn outlet(
        kind: OutletKind,
        http: reqwest::Client,
        target: &OutletTarget<'_>,
    ) -> DynamicOutlet {
        tracing::info!(outlet = %kind, base_url = %target.base_url, "creating outlet");

        match kind {
            OutletKind::DryRun => Arc::new(DryRunOutlet),
            OutletKind::Http => Arc::new(HttpOutlet::new(
                http,
                target.base_url,
                target.on_path,
                target.off_path,
            )),
        }
    }
}
