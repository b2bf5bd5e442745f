use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local, TimeZone, Utc};
use clap::ValueEnum;

use crate::errors::ScheduleError;
use crate::scheduling::slot_label::SlotLabel;

/// Time reference the feed's hour labels are expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FeedTimeZone {
    #[default]
    Utc,
    Local,
}

impl fmt::Display for FeedTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
        }
    }
}

impl FromStr for FeedTimeZone {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "utc" | "UTC" => Ok(Self::Utc),
            "local" => Ok(Self::Local),
            other => Err(anyhow!("unknown feed time zone: {other}")),
        }
    }
}

/// Turns the first slot of a window into today's start instant.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeResolver {
    time_zone: FeedTimeZone,
}

impl TimeResolver {
    pub fn new(time_zone: FeedTimeZone) -> Self {
        Self { time_zone }
    }

    pub fn time_zone(&self) -> FeedTimeZone {
        self.time_zone
    }

    /// Only the start hour of the label is used. Fails with
    /// [`ScheduleError::Stale`] unless the instant is strictly after `now`.
    pub fn resolve(&self, label: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        let slot: SlotLabel = label.parse()?;

        let start = match self.time_zone {
            FeedTimeZone::Utc => start_of_slot_today(&Utc, slot, label, now)?,
            FeedTimeZone::Local => start_of_slot_today(&Local, slot, label, now)?,
        };

        if start <= now {
            return Err(ScheduleError::Stale { start, now });
        }

        Ok(start)
    }
}

fn start_of_slot_today<Tz: TimeZone>(
    time_zone: &Tz,
    slot: SlotLabel,
    label: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let today = now.with_timezone(time_zone).date_naive();
    let naive = today
        .and_hms_opt(slot.start_hour, 0, 0)
        .ok_or_else(|| ScheduleError::malformed_label(label, "start hour is out of range"))?;

    time_zone
        .from_local_datetime(&naive)
        .earliest()
        .map(|start| start.with_timezone(&Utc))
        .ok_or_else(|| {
            ScheduleError::malformed_label(label, "start hour does not exist in the feed time zone")
        })
}
