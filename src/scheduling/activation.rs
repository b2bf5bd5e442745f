use std::fmt;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    Pending,
    Activating,
    Active,
    Deactivating,
    Completed,
    Aborted,
}

impl ActivationStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Activating => "activating",
            Self::Active => "active",
            Self::Deactivating => "deactivating",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Observer of one armed on/off sequence. Cloning it does not duplicate the
/// sequence.
#[derive(Debug, Clone)]
pub struct ScheduledActivation {
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    status: watch::Receiver<ActivationStatus>,
}

impl ScheduledActivation {
    pub(crate) fn new(
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: watch::Receiver<ActivationStatus>,
    ) -> Self {
        Self {
            id,
            start,
            end,
            status,
        }
    }

    pub fn status(&self) -> ActivationStatus {
        *self.status.borrow()
    }

    /// Resolves with the terminal status once the sequence has ended.
    pub async fn finished(&self) -> ActivationStatus {
        let mut status = self.status.clone();
        if let Ok(finished) = status.wait_for(|status| status.is_finished()).await {
            return *finished;
        }

        /* NOTE: the task only drops its sender after publishing a terminal status */
        *status.borrow()
    }
}
