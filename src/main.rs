mod config;
mod errors;
mod feed;
mod outlet;
mod pipeline;
mod scenario;
mod scheduling;
mod trigger;
mod types;
mod window;

use std::num::{NonZeroU32, NonZeroUsize};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use clap::Parser;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::endpoint::parse_endpoint;
use crate::feed::http_price_feed::HttpPriceFeed;
use crate::outlet::http_outlet::{DEFAULT_OFF_PATH, DEFAULT_ON_PATH};
use crate::pipeline::Pipeline;
use crate::scenario::outlets::OutletKind;
use crate::scenario::scenario::{OutletTarget, Scenario};
use crate::scheduling::activation_scheduler::ActivationScheduler;
use crate::scheduling::time_resolver::{FeedTimeZone, TimeResolver};
use crate::trigger::daily_trigger::DailyTrigger;
use crate::window::window_finder::WindowFinder;

/// Switch a smart plug on for the cheapest consecutive hours of the day.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
struct Args {
    /// Price feed returning a JSON object of `"HH-HH"` slots.
    #[arg(long, env = "PRICE_FEED_URL", value_parser = parse_endpoint)]
    pub price_feed_url: Url,

    /// Base address of the plug.
    #[arg(long, env = "OUTLET_URL", value_parser = parse_endpoint)]
    pub outlet_url: Url,

    #[arg(long, env = "OUTLET", value_enum, default_value = "http")]
    pub outlet: OutletKind,

    #[arg(long, env = "OUTLET_ON_PATH", default_value = DEFAULT_ON_PATH)]
    pub outlet_on_path: String,

    #[arg(long, env = "OUTLET_OFF_PATH", default_value = DEFAULT_OFF_PATH)]
    pub outlet_off_path: String,

    /// Time reference of the feed's hour labels.
    #[arg(long, env = "FEED_TIME_ZONE", value_enum, default_value = "utc")]
    pub feed_time_zone: FeedTimeZone,

    /// Number of consecutive slots to look for.
    #[arg(long, env = "WINDOW_SLOTS", default_value = "3")]
    pub window_slots: NonZeroUsize,

    /// How long the plug stays on.
    #[arg(long, env = "ACTIVE_HOURS", default_value = "3")]
    pub active_hours: NonZeroU32,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "30")]
    pub http_timeout_secs: u64,

    /// Schedule today's window, wait for it to finish and exit.
    #[arg(long)]
    pub once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("cheap_plug=debug".parse()?)
                .add_directive("hyper=info".parse()?)
                .add_directive("reqwest=info".parse()?),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    info!(
        price_feed = %args.price_feed_url,
        outlet = %args.outlet_url,
        time_zone = %args.feed_time_zone,
        "starting"
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.http_timeout_secs))
        .build()
        .context("failed to build HTTP client")?;

    let feed = Arc::new(HttpPriceFeed::new(http.clone(), args.price_feed_url.clone()));
    let outlet = Scenario::outlet(
        args.outlet,
        http,
        &OutletTarget {
            base_url: &args.outlet_url,
            on_path: &args.outlet_on_path,
            off_path: &args.outlet_off_path,
        },
    );

    let pipeline = Arc::new(
        Pipeline::new(feed, ActivationScheduler::new(outlet))
            .with_finder(WindowFinder::new(args.window_slots))
            .with_resolver(TimeResolver::new(args.feed_time_zone))
            .with_active_for(TimeDelta::hours(args.active_hours.get().into())),
    );

    pipeline.run().await;

    if args.once {
        if let Some(activation) = pipeline.armed().await {
            tokio::select! {
                status = activation.finished() => info!(%status, "activation finished"),
                signal = tokio::signal::ctrl_c() => {
                    signal.context("failed to listen for ctrl-c")?;
                    info!("interrupted");
                }
            }
        }
        pipeline.shutdown().await;
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    let trigger = tokio::spawn(DailyTrigger::new(pipeline.clone(), shutdown.clone()).run());
    info!("running, press ctrl-c to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;

    info!("shutting down");
    shutdown.cancel();
    if let Err(error) = trigger.await {
        warn!(%error, "daily trigger did not stop cleanly");
    }
    pipeline.shutdown().await;

    Ok(())
}
