use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::SyncError;
use crate::notification::{Notification, Notifier, ROLLBACK_MESSAGE};
use crate::store::{Store, SyncPhase};

/// Drives one optimistic mutation at a time per call:
/// snapshot, apply, persist, then either keep `next` or restore the snapshot.
///
/// Calls are not serialized per entity. If two calls touch the same entity
/// and the first one fails after the second one applied, the rollback
/// restores the first call's snapshot and the second change is lost locally.
pub struct SyncController<S> {
    store: Store<S>,
    notifier: Arc<dyn Notifier>,
}

impl<S> SyncController<S>
where
    S: Clone + Send + Sync,
{
    pub fn new(initial: S, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: Store::new(initial),
            notifier,
        }
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub async fn current(&self) -> S {
        self.store.current().await
    }

    pub fn phase(&self) -> SyncPhase {
        self.store.phase()
    }

    /// `mutation` computes the optimistic state and returns the minimal
    /// payload handed to `persist`. Local errors from `mutation` block the
    /// persistence call; persistence errors roll back the whole state.
    pub async fn commit<R, T, M, P, Fut>(
        &self,
        action: &str,
        mutation: M,
        persist: P,
    ) -> Result<T, SyncError>
    where
        M: FnOnce(&mut S) -> Result<R, SyncError>,
        P: FnOnce(R) -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let applied = match self.store.apply(mutation).await {
            Ok(applied) => applied,
            Err(e) => {
                debug!("{} rejected before persisting: {}", action, e);
                self.notifier.notify(Notification::error(action, e.to_string())).await;
                return Err(e);
            }
        };

        let result = {
            let _pending = self.store.begin();
            persist(applied.output).await
        };

        match result {
            Ok(value) => {
                debug!("{} persisted", action);
                self.notifier.notify(Notification::success(action)).await;
                Ok(value)
            }
            Err(e) => {
                warn!("{} failed, rolling back: {:#}", action, e);
                self.store.rollback(applied.snapshot).await;
                self.notifier.notify(Notification::error(action, ROLLBACK_MESSAGE)).await;
                Err(SyncError::Persistence {
                    action: action.to_string(),
                    message: format!("{:#}", e),
                })
            }
        }
    }

    /// Reports a local failure that happened outside `commit`, such as an
    /// upload rejected by its size guard.
    pub async fn reject(&self, action: &str, error: SyncError) -> SyncError {
        self.notifier.notify(Notification::error(action, error.to_string())).await;
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{MockNotifier, NotificationLevel};
    use anyhow::anyhow;
    use assert_matches::assert_matches;
    use mockall::predicate::function;

    fn controller_expecting(level: NotificationLevel) -> SyncController<Vec<&'static str>> {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(function(move |n: &Notification| n.level == level))
            .times(1)
            .returning(|_| ());
        SyncController::new(vec!["A", "B", "C"], Arc::new(notifier))
    }

    #[tokio::test]
    async fn test_success_keeps_optimistic_state() {
        let controller = controller_expecting(NotificationLevel::Success);

        let persisted = controller
            .commit(
                "Hapus",
                |items| {
                    items.retain(|i| *i != "B");
                    Ok("B")
                },
                |removed| async move { Ok::<_, anyhow::Error>(removed) },
            )
            .await
            .unwrap();

        assert_eq!(persisted, "B");
        assert_eq!(controller.current().await, vec!["A", "C"]);
        assert_eq!(controller.phase(), SyncPhase::Settled);
    }

    #[tokio::test]
    async fn test_failure_restores_snapshot() {
        let controller = controller_expecting(NotificationLevel::Error);

        let result: Result<(), SyncError> = controller
            .commit(
                "Hapus",
                |items| {
                    items.clear();
                    Ok(())
                },
                |_| async { Err(anyhow!("network down")) },
            )
            .await;

        assert_matches!(result, Err(SyncError::Persistence { ref action, .. }) if action == "Hapus");
        assert_eq!(controller.current().await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_validation_blocks_persist_call() {
        let controller = controller_expecting(NotificationLevel::Error);

        let result: Result<(), SyncError> = controller
            .commit(
                "Tambah",
                |_| Err(SyncError::validation("Nama wajib diisi")),
                |_: ()| async { Err::<(), _>(anyhow!("persist must not run")) },
            )
            .await;

        assert_matches!(result, Err(SyncError::Validation(_)));
        assert_eq!(controller.current().await, vec!["A", "B", "C"]);
    }
}
