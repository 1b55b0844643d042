//! The single published-state slot.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::snapshot::DashboardState;

/// Thread-safe holder of the current [`DashboardState`].
///
/// Writers replace the whole state in one assignment and readers get an
/// `Arc` to an immutable value, so a reader never sees a summary from one
/// refresh next to stations from another.
#[derive(Clone, Default)]
pub struct StateCell {
    inner: Arc<RwLock<Arc<DashboardState>>>,
}

impl StateCell {
    /// Create a cell in the `Pending` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The state as of now.
    pub async fn current(&self) -> Arc<DashboardState> {
        let guard = self.inner.read().await;
        Arc::clone(&*guard)
    }

    /// Replace the state.
    pub async fn publish(&self, state: DashboardState) {
        let state = Arc::new(state);
        let mut guard = self.inner.write().await;
        *guard = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::Snapshot;
    use chrono::Utc;

    #[tokio::test]
    async fn starts_pending() {
        let cell = StateCell::new();
        assert_eq!(*cell.current().await, DashboardState::Pending);
    }

    #[tokio::test]
    async fn publish_replaces_state() {
        let cell = StateCell::new();
        let snapshot = Arc::new(Snapshot::build(vec![], None, Utc::now()));
        cell.publish(DashboardState::Ready(snapshot.clone())).await;

        assert_eq!(*cell.current().await, DashboardState::Ready(snapshot));
    }

    #[tokio::test]
    async fn readers_keep_their_copy() {
        let cell = StateCell::new();
        let before = cell.current().await;

        let snapshot = Arc::new(Snapshot::build(vec![], None, Utc::now()));
        cell.publish(DashboardState::Ready(snapshot)).await;

        // An earlier reader still holds the old, complete state
        assert_eq!(*before, DashboardState::Pending);
        assert_eq!(cell.current().await.status_label(), "ok");
    }

    #[tokio::test]
    async fn clones_share_the_slot() {
        let cell = StateCell::new();
        let other = cell.clone();
        let snapshot = Arc::new(Snapshot::build(vec![], None, Utc::now()));
        other.publish(DashboardState::Ready(snapshot)).await;
        assert_eq!(cell.current().await.status_label(), "ok");
    }
}
