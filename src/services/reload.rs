use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Resource a reload refreshes. Each session owns one slot per resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Tasks,
    Roster,
    Overdue,
}

/// Serialises reloads of one resource: starting a reload aborts the one
/// still in flight, and only the newest reload may commit its result.
#[derive(Clone, Debug, Default)]
pub struct ReloadSlot {
    inner: Arc<Mutex<SlotInner>>,
}

#[derive(Debug, Default)]
struct SlotInner {
    generation: u64,
    in_flight: Option<AbortHandle>,
}

impl ReloadSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` in its own task and hand its output to `commit`.
    ///
    /// Returns `None` without calling `commit` when a newer reload started
    /// before this one finished. `commit` runs under the slot lock, so two
    /// reloads never commit out of order.
    pub async fn run<T, R, F, C>(&self, fut: F, commit: C) -> Option<R>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        C: FnOnce(T) -> R,
    {
        let task = tokio::spawn(fut);
        let generation = {
            let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            inner.generation += 1;
            if let Some(previous) = inner.in_flight.replace(task.abort_handle()) {
                previous.abort();
            }
            inner.generation
        };

        let result = task.await;

        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if inner.generation != generation {
            tracing::debug!(generation, latest = inner.generation, "Reload superseded");
            return None;
        }
        inner.in_flight = None;
        match result {
            Ok(value) => Some(commit(value)),
            Err(e) => {
                if e.is_panic() {
                    tracing::error!(error = %e, "Reload task panicked");
                }
                None
            }
        }
    }

    #[cfg(test)]
    fn is_busy(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .is_some()
    }
}

/// The per-session reload slots, one per [`Resource`].
#[derive(Clone, Debug, Default)]
pub struct Reloads {
    tasks: ReloadSlot,
    roster: ReloadSlot,
    overdue: ReloadSlot,
}

impl Reloads {
    pub fn slot(&self, resource: Resource) -> &ReloadSlot {
        match resource {
            Resource::Tasks => &self.tasks,
            Resource::Roster => &self.roster,
            Resource::Overdue => &self.overdue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_single_reload_commits() {
        let slot = ReloadSlot::new();
        let committed = slot.run(async { 7 }, |v| v * 2).await;
        assert_eq!(committed, Some(14));
        assert!(!slot.is_busy());
    }

    #[tokio::test]
    async fn test_newer_reload_supersedes_older() {
        let slot = ReloadSlot::new();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let slow = {
            let slot = slot.clone();
            tokio::spawn(async move {
                slot.run(
                    async move {
                        let _ = release_rx.await;
                        "stale"
                    },
                    |v| v,
                )
                .await
            })
        };
        // Let the slow reload register before starting the newer one.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(slot.is_busy());

        let fresh = slot.run(async { "fresh" }, |v| v).await;
        let _ = release_tx.send(());

        assert_eq!(fresh, Some("fresh"));
        assert_eq!(slow.await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let reloads = Reloads::default();
        let a = reloads.slot(Resource::Tasks).run(async { 1 }, |v| v).await;
        let b = reloads.slot(Resource::Roster).run(async { 2 }, |v| v).await;
        assert_eq!((a, b), (Some(1), Some(2)));
    }
}
