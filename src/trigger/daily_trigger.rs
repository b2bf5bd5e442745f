use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::pipeline::Pipeline;
use crate::scheduling::time_resolver::FeedTimeZone;

/// Runs the pipeline at every midnight of the feed's time zone until
/// `shutdown` fires. Labels then resolve against the day that just began.
pub struct DailyTrigger {
    pipeline: Arc<Pipeline>,
    shutdown: CancellationToken,
}

impl DailyTrigger {
    pub fn new(pipeline: Arc<Pipeline>, shutdown: CancellationToken) -> Self {
        Self { pipeline, shutdown }
    }

    pub async fn run(self) {
        loop {
            let time_zone = self.pipeline.time_zone();
            let wait = until_next_feed_midnight(time_zone, self.pipeline.now());
            info!(wait_secs = wait.as_secs(), %time_zone, "next price refresh scheduled");

            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("daily trigger stopped");
                    return;
                }
                () = tokio::time::sleep(wait) => {}
            }

            self.pipeline.run().await;
        }
    }
}

pub fn until_next_feed_midnight(time_zone: FeedTimeZone, now: DateTime<Utc>) -> Duration {
    match time_zone {
        FeedTimeZone::Utc => until_next_midnight(&now),
        FeedTimeZone::Local => until_next_midnight(&now.with_timezone(&Local)),
    }
}

/// Time left until the next midnight in `now`'s time zone. A midnight skipped by
/// a DST change falls back to exactly one day from now.
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let timezone = now.timezone();
    let next_midnight = now
        .date_naive()
        .succ_opt()
        .map(|tomorrow| tomorrow.and_time(NaiveTime::MIN))
        .and_then(|midnight| timezone.from_local_datetime(&midnight).earliest());

    let next = match next_midnight {
        Some(next) => next,
        None => now.clone() + TimeDelta::days(1),
    };

    (next - now.clone()).to_std().unwrap_or_default()
}
