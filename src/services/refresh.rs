use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::session::{reload_tasks, ReloadOutcome, SessionStore};
use crate::api::ApiClient;

/// Counts from one refresh pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub refreshed: usize,
    pub superseded: usize,
    pub failed: usize,
    pub pruned: usize,
}

/// Drop idle sessions, then re-fetch the task list of every remaining one.
/// Roster and overdue notice are left alone.
pub async fn refresh_active(api: &ApiClient, sessions: &SessionStore, idle: Duration) -> RefreshReport {
    let mut report = RefreshReport {
        pruned: sessions.prune_idle(idle),
        ..RefreshReport::default()
    };
    for handle in sessions.active(idle) {
        match reload_tasks(api, &handle).await {
            Ok(ReloadOutcome::Superseded) => report.superseded += 1,
            Ok(_) => report.refreshed += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Periodic refresh failed");
                handle.notify(e.notice());
                report.failed += 1;
            }
        }
    }
    report
}

/// Refresh every active session each `interval`, for as long as the
/// process lives. The first pass runs one interval after start.
pub fn spawn_refresh_driver(
    api: ApiClient,
    sessions: SessionStore,
    interval: Duration,
    idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = interval.as_secs(), "Refresh driver started");
        loop {
            ticker.tick().await;
            if sessions.is_empty() {
                continue;
            }
            let report = refresh_active(&api, &sessions, idle).await;
            tracing::debug!(?report, "Refresh pass finished");
        }
    })
}
