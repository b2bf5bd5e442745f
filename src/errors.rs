use chrono::{DateTime, Utc};
use thiserror::Error;

/// Everything that can end a pipeline run or an armed activation early.
///
/// None of these are fatal to the process: they are logged and the next daily
/// run starts from scratch.
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("failed to fetch prices: {0:#}")]
    Fetch(anyhow::Error),

    #[error("need at least {required} price slots, got {found}")]
    InsufficientData { found: usize, required: usize },

    #[error("malformed slot label {label:?}: {reason}")]
    MalformedLabel { label: String, reason: &'static str },

    #[error("start {start} is not after {now}")]
    Stale {
        start: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("failed to power the outlet on: {0:#}")]
    Activation(anyhow::Error),

    #[error("failed to power the outlet off: {0:#}")]
    Deactivation(anyhow::Error),
}

impl ScheduleError {
    pub fn malformed_label(label: &str, reason: &'static str) -> Self {
        Self::MalformedLabel {
            label: label.to_string(),
            reason,
        }
    }
}
