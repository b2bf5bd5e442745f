use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::ScheduleError;
use crate::outlet::DynamicOutlet;
use crate::scheduling::activation::{ActivationStatus, ScheduledActivation};

pub const DEFAULT_ACTIVE_DURATION: TimeDelta = TimeDelta::hours(3);

struct ArmedActivation {
    activation: ScheduledActivation,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Owns the one on/off sequence that may be armed at a time.
///
/// Arming a new sequence cancels the previous one: a pending sequence ends
/// without touching the outlet, an active one switches the outlet off first.
pub struct ActivationScheduler {
    outlet: DynamicOutlet,
    armed: Mutex<Option<ArmedActivation>>,
}

impl ActivationScheduler {
    pub fn new(outlet: DynamicOutlet) -> Self {
        Self {
            outlet,
            armed: Mutex::new(None),
        }
    }

    /// Spawns the sequence and returns without waiting for `start`. The wait is
    /// computed here from `now`, once. A previously armed sequence is cancelled
    /// and joined first, so its power-off always lands before the new power-on.
    pub async fn arm(
        &self,
        start: DateTime<Utc>,
        active_for: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<ScheduledActivation, ScheduleError> {
        let Ok(wait) = (start - now).to_std() else {
            return Err(ScheduleError::Stale { start, now });
        };
        if wait.is_zero() {
            return Err(ScheduleError::Stale { start, now });
        }
        let deadline = Instant::now() + wait;
        let active_for_std = active_for.to_std().unwrap_or_default();

        let (status_tx, status_rx) = watch::channel(ActivationStatus::Pending);
        let activation =
            ScheduledActivation::new(Uuid::new_v4(), start, start + active_for, status_rx);
        let cancel = CancellationToken::new();

        let mut armed = self.armed.lock().await;

        if let Some(previous) = armed.take() {
            info!(
                id = %previous.activation.id,
                status = %previous.activation.status(),
                "replacing previously armed activation"
            );
            previous.cancel.cancel();
            if let Err(e) = previous.task.await {
                warn!(
                    id = %previous.activation.id,
                    error = %e,
                    "replaced activation did not finish cleanly"
                );
            }
        }

        let task = tokio::spawn(run_activation(
            self.outlet.clone(),
            activation.id,
            deadline,
            active_for_std,
            cancel.clone(),
            status_tx,
        ));

        info!(
            id = %activation.id,
            start = %activation.start,
            end = %activation.end,
            "activation armed"
        );

        *armed = Some(ArmedActivation {
            activation: activation.clone(),
            cancel,
            task,
        });

        Ok(activation)
    }

    pub async fn armed(&self) -> Option<ScheduledActivation> {
        self.armed
            .lock()
            .await
            .as_ref()
            .map(|armed| armed.activation.clone())
    }

    /// Cancels the armed sequence, if any, and waits for it to wind down.
    pub async fn shutdown(&self) {
        let Some(armed) = self.armed.lock().await.take() else {
            return;
        };

        armed.cancel.cancel();
        if let Err(e) = armed.task.await {
            warn!(id = %armed.activation.id, error = %e, "activation task did not finish cleanly");
        }
    }
}

async fn run_activation(
    outlet: DynamicOutlet,
    id: Uuid,
    deadline: Instant,
    active_for: Duration,
    cancel: CancellationToken,
    status: watch::Sender<ActivationStatus>,
) {
    let wait = deadline.saturating_duration_since(Instant::now());
    tracing::debug!(%id, wait_secs = wait.as_secs(), "waiting for activation start");

    tokio::select! {
        () = cancel.cancelled() => {
            info!(%id, "activation cancelled before start");
            status.send_replace(ActivationStatus::Aborted);
            return;
        }
        () = tokio::time::sleep_until(deadline) => {}
    }

    status.send_replace(ActivationStatus::Activating);
    if let Err(e) = outlet.power_on().await {
        let error = ScheduleError::Activation(e);
        error!(%id, %error, "activation aborted");
        status.send_replace(ActivationStatus::Aborted);
        return;
    }

    status.send_replace(ActivationStatus::Active);
    info!(%id, active_secs = active_for.as_secs(), "outlet on");

    let cancelled = tokio::select! {
        () = cancel.cancelled() => true,
        () = tokio::time::sleep(active_for) => false,
    };
    if cancelled {
        info!(%id, "activation cancelled while active, switching off early");
    }

    status.send_replace(ActivationStatus::Deactivating);
    if let Err(e) = outlet.power_off().await {
        let error = ScheduleError::Deactivation(e);
        error!(%id, %error, "deactivation failed");
    } else {
        info!(%id, "outlet off");
    }

    let terminal = if cancelled {
        ActivationStatus::Aborted
    } else {
        ActivationStatus::Completed
    };
    status.send_replace(terminal);
}
