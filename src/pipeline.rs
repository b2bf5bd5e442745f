use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info, warn};

use crate::errors::ScheduleError;
use crate::feed::DynamicPriceFeed;
use crate::scheduling::activation::ScheduledActivation;
use crate::scheduling::activation_scheduler::{ActivationScheduler, DEFAULT_ACTIVE_DURATION};
use crate::scheduling::time_resolver::{FeedTimeZone, TimeResolver};
use crate::window::window_finder::WindowFinder;

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Fetch prices, pick the cheapest window, arm the outlet for it.
pub struct Pipeline {
    feed: DynamicPriceFeed,
    finder: WindowFinder,
    resolver: TimeResolver,
    scheduler: ActivationScheduler,
    active_for: TimeDelta,
    clock: Clock,
}

impl Pipeline {
    pub fn new(feed: DynamicPriceFeed, scheduler: ActivationScheduler) -> Self {
        Self {
            feed,
            finder: WindowFinder::default(),
            resolver: TimeResolver::default(),
            scheduler,
            active_for: DEFAULT_ACTIVE_DURATION,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_finder(mut self, finder: WindowFinder) -> Self {
        self.finder = finder;
        self
    }

    pub fn with_resolver(mut self, resolver: TimeResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_active_for(mut self, active_for: TimeDelta) -> Self {
        self.active_for = active_for;
        self
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Time reference of the slot labels; the daily refresh follows it.
    pub fn time_zone(&self) -> FeedTimeZone {
        self.resolver.time_zone()
    }

    /// Entry point for start-up and the daily trigger. Failures end the run and
    /// are only logged.
    pub async fn run(&self) {
        info!("updating prices and scheduling the outlet");

        match self.try_run().await {
            Ok(activation) => info!(
                id = %activation.id,
                start = %activation.start,
                end = %activation.end,
                "outlet scheduled"
            ),
            Err(error @ ScheduleError::Stale { .. }) => {
                warn!(%error, "cheapest window already started, nothing scheduled today");
            }
            Err(error) => error!(%error, "pipeline run failed"),
        }
    }

    pub async fn try_run(&self) -> Result<ScheduledActivation, ScheduleError> {
        let table = self.feed.fetch().await.map_err(ScheduleError::Fetch)?;

        let window = self.finder.find(&table)?;
        info!(
            window = %window,
            total = %window.total,
            slots = self.finder.slots(),
            "cheapest window selected"
        );

        let start = self.resolver.resolve(&window.start_label, self.now())?;

        self.scheduler.arm(start, self.active_for, self.now()).await
    }

    pub async fn armed(&self) -> Option<ScheduledActivation> {
        self.scheduler.armed().await
    }

    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use anyhow::{Result, bail};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use mockito::Server;
    use tracing_subscriber::layer::SubscriberExt;
    use url::Url;

    use super::*;
    use crate::feed::PriceFeed;
    use crate::feed::http_price_feed::HttpPriceFeed;
    use crate::scheduling::activation::ActivationStatus;
    use crate::scheduling::activation_scheduler::tests::{Call, ErrorCounter, RecordingOutlet};
    use crate::types::{price::Price, price_entry::PriceEntry, price_table::PriceTable};

    pub(crate) struct StaticFeed {
        prices: Option<Vec<(&'static str, f64)>>,
        fetches: AtomicUsize,
    }

    impl StaticFeed {
        pub fn new(prices: &[(&'static str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                prices: Some(prices.to_vec()),
                fetches: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                prices: None,
                fetches: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PriceFeed for StaticFeed {
        async fn fetch(&self) -> Result<PriceTable> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let Some(prices) = &self.prices else {
                bail!("connection refused");
            };

            Ok(prices
                .iter()
                .map(|(label, price)| PriceEntry::new(*label, Price::new(*price).unwrap()))
                .collect())
        }
    }

    pub(crate) const PRICES: &[(&str, f64)] = &[
        ("00-01", 10.0),
        ("01-02", 5.0),
        ("02-03", 4.0),
        ("03-04", 3.0),
        ("04-05", 20.0),
    ];

    fn just_after_midnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 5, 0).unwrap()
    }

    fn mid_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
    }

    fn pipeline(
        feed: Arc<StaticFeed>,
        outlet: &Arc<RecordingOutlet>,
        clock: fn() -> DateTime<Utc>,
    ) -> Pipeline {
        Pipeline::new(feed, ActivationScheduler::new(outlet.clone())).with_clock(clock)
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_the_cheapest_window() {
        let outlet = Arc::new(RecordingOutlet::default());
        let pipeline = pipeline(StaticFeed::new(PRICES), &outlet, just_after_midnight);

        let activation = pipeline.try_run().await.unwrap();

        assert_eq!(activation.start, Utc.with_ymd_and_hms(2024, 1, 15, 1, 0, 0).unwrap());
        assert_eq!(activation.end, Utc.with_ymd_and_hms(2024, 1, 15, 4, 0, 0).unwrap());
        assert_eq!(activation.finished().await, ActivationStatus::Completed);

        let instants = outlet.instants();
        assert_eq!(outlet.calls(), [Call::On, Call::Off]);
        assert_eq!(instants[1] - instants[0], Duration::from_secs(3 * 3600));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_window_is_not_scheduled() {
        let outlet = Arc::new(RecordingOutlet::default());
        let pipeline = pipeline(StaticFeed::new(PRICES), &outlet, mid_morning);

        let error = pipeline.try_run().await.unwrap_err();

        assert!(matches!(error, ScheduleError::Stale { .. }));
        assert!(pipeline.armed().await.is_none());
        tokio::time::sleep(Duration::from_secs(24 * 3600)).await;
        assert!(outlet.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_failure_ends_the_run() {
        let outlet = Arc::new(RecordingOutlet::default());
        let feed = StaticFeed::failing();
        let pipeline = pipeline(feed.clone(), &outlet, just_after_midnight);

        let error = pipeline.try_run().await.unwrap_err();
        assert!(matches!(error, ScheduleError::Fetch(_)));

        pipeline.run().await;
        assert_eq!(feed.fetches.load(Ordering::SeqCst), 2);
        assert!(pipeline.armed().await.is_none());
        assert!(outlet.calls().is_empty());
    }

    #[tokio::test]
    async fn unparseable_feed_logs_one_error() {
        let errors = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(errors.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/prices")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;
        let url = Url::parse(&format!("{}/prices", server.url())).unwrap();
        let feed = Arc::new(HttpPriceFeed::new(reqwest::Client::new(), url));
        let outlet = Arc::new(RecordingOutlet::default());
        let pipeline = Pipeline::new(feed, ActivationScheduler::new(outlet.clone()));

        pipeline.run().await;

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert!(pipeline.armed().await.is_none());
        mock.assert_async().await;
    }

    #[tokio::test(start_paused = true)]
    async fn too_few_prices_end_the_run() {
        let outlet = Arc::new(RecordingOutlet::default());
        let feed = StaticFeed::new(&[("00-01", 1.0), ("01-02", 2.0)]);
        let pipeline = pipeline(feed, &outlet, just_after_midnight);

        let error = pipeline.try_run().await.unwrap_err();

        assert!(matches!(
            error,
            ScheduleError::InsufficientData {
                found: 2,
                required: 3
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_window_label_ends_the_run() {
        let outlet = Arc::new(RecordingOutlet::default());
        let feed = StaticFeed::new(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let pipeline = pipeline(feed, &outlet, just_after_midnight);

        let error = pipeline.try_run().await.unwrap_err();

        assert!(matches!(error, ScheduleError::MalformedLabel { .. }));
        assert!(outlet.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn second_run_replaces_the_first() {
        let outlet = Arc::new(RecordingOutlet::default());
        let pipeline = pipeline(StaticFeed::new(PRICES), &outlet, just_after_midnight);

        let first = pipeline.try_run().await.unwrap();
        let second = pipeline.try_run().await.unwrap();

        assert_eq!(first.finished().await, ActivationStatus::Aborted);
        assert_eq!(second.finished().await, ActivationStatus::Completed);
        assert_eq!(outlet.calls(), [Call::On, Call::Off]);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_duration_is_honoured() {
        let outlet = Arc::new(RecordingOutlet::default());
        let pipeline = pipeline(StaticFeed::new(PRICES), &outlet, just_after_midnight)
            .with_active_for(TimeDelta::hours(2));

        let activation = pipeline.try_run().await.unwrap();
        activation.finished().await;

        let instants = outlet.instants();
        assert_eq!(instants[1] - instants[0], Duration::from_secs(2 * 3600));
    }
}
