use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Pending,
    Settled,
}

/// Result of an optimistic apply: the pre-mutation snapshot, the state now
/// visible to readers, and whatever the mutation produced for persistence.
#[derive(Debug, Clone)]
pub struct Applied<S, R> {
    pub snapshot: S,
    pub next: S,
    pub output: R,
}

/// Local view state. Writers go through `apply` and `rollback`; the lock is
/// never held across a persistence call.
pub struct Store<S> {
    state: Arc<RwLock<S>>,
    in_flight: Arc<AtomicUsize>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<S> Store<S>
where
    S: Clone + Send + Sync,
{
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub async fn current(&self) -> S {
        self.state.read().await.clone()
    }

    pub async fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let guard = self.state.read().await;
        f(&*guard)
    }

    /// Replaces the whole state, e.g. after a fresh load from the store.
    pub async fn replace(&self, state: S) {
        *self.state.write().await = state;
    }

    /// Runs `mutation` against a copy of the current state and publishes the
    /// copy only if the mutation succeeds.
    pub async fn apply<R, E>(
        &self,
        mutation: impl FnOnce(&mut S) -> Result<R, E>,
    ) -> Result<Applied<S, R>, E> {
        let mut guard = self.state.write().await;
        let snapshot = guard.clone();
        let mut next = snapshot.clone();

        let output = mutation(&mut next)?;
        *guard = next.clone();

        Ok(Applied { snapshot, next, output })
    }

    /// Full rollback: the snapshot replaces whatever is current.
    pub async fn rollback(&self, snapshot: S) -> S {
        let mut guard = self.state.write().await;
        *guard = snapshot;
        guard.clone()
    }

    pub fn pending(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn phase(&self) -> SyncPhase {
        if self.pending() > 0 {
            SyncPhase::Pending
        } else {
            SyncPhase::Settled
        }
    }

    pub(crate) fn begin(&self) -> PendingGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        PendingGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

pub(crate) struct PendingGuard {
    in_flight: Arc<AtomicUsize>,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failed_mutation_leaves_state_untouched() {
        let store = Store::new(vec![1, 2, 3]);

        let result: Result<Applied<Vec<i32>, ()>, &str> = store
            .apply(|items| {
                items.push(4);
                Err("rejected")
            })
            .await;

        assert!(result.is_err());
        assert_eq!(store.current().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_apply_then_rollback() {
        let store = Store::new(vec![1, 2, 3]);

        let applied = store
            .apply(|items| -> Result<usize, ()> {
                items.retain(|i| *i != 2);
                Ok(items.len())
            })
            .await
            .unwrap();

        assert_eq!(applied.output, 2);
        assert_eq!(store.current().await, vec![1, 3]);

        let restored = store.rollback(applied.snapshot).await;
        assert_eq!(restored, vec![1, 2, 3]);
    }

    #[test]
    fn test_read_borrows_current_state() {
        let store = Store::new(vec![4, 5, 6]);

        let total: i32 = tokio_test::block_on(store.read(|items| items.iter().sum()));

        assert_eq!(total, 15);
    }

    #[test]
    fn test_phase_tracks_pending_calls() {
        let store = Store::new(0u8);
        assert_eq!(store.phase(), SyncPhase::Settled);

        let guard = store.begin();
        assert_eq!(store.phase(), SyncPhase::Pending);

        drop(guard);
        assert_eq!(store.phase(), SyncPhase::Settled);
    }
}
