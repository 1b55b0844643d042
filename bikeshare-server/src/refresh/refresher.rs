//! Timer-driven refresh with a single-flight guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::gbfs::{ErrorKind, FeedSource};

use super::pipeline::run_pipeline;
use super::snapshot::{DashboardState, RefreshFailure};
use super::state::StateCell;

/// Whether a refresh is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Refreshing,
}

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Ran the pipeline and published a fresh snapshot.
    Refreshed,
    /// Ran the pipeline and published a failure.
    Failed(ErrorKind),
    /// Another refresh was still running; did nothing.
    Skipped,
}

/// Clears the in-flight flag when dropped, including on cancellation.
struct FlightGuard<'a>(&'a AtomicBool);

impl<'a> FlightGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard(flag))
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs the feed pipeline and publishes each result into a [`StateCell`].
pub struct Refresher<S> {
    source: S,
    discovery_url: String,
    language: String,
    cell: StateCell,
    refreshing: AtomicBool,
}

impl<S: FeedSource + 'static> Refresher<S> {
    pub fn new(
        source: S,
        discovery_url: impl Into<String>,
        language: impl Into<String>,
        cell: StateCell,
    ) -> Self {
        Self {
            source,
            discovery_url: discovery_url.into(),
            language: language.into(),
            cell,
            refreshing: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> RefreshState {
        if self.refreshing.load(Ordering::Acquire) {
            RefreshState::Refreshing
        } else {
            RefreshState::Idle
        }
    }

    /// The cell this refresher publishes into.
    pub fn cell(&self) -> &StateCell {
        &self.cell
    }

    /// Run one refresh unless one is already in flight.
    ///
    /// Failures are published as [`DashboardState::Failed`], carrying over
    /// the last good snapshot; they never propagate out of the tick.
    pub async fn tick(&self) -> TickOutcome {
        let Some(_guard) = FlightGuard::try_acquire(&self.refreshing) else {
            debug!("Refresh still in flight, skipping tick");
            return TickOutcome::Skipped;
        };

        match run_pipeline(&self.source, &self.discovery_url, &self.language).await {
            Ok(snapshot) => {
                info!(
                    stations = snapshot.summary.online_stations,
                    bikes = snapshot.summary.total_bikes,
                    docks = snapshot.summary.total_docks,
                    "Published refreshed station data"
                );
                self.cell
                    .publish(DashboardState::Ready(Arc::new(snapshot)))
                    .await;
                TickOutcome::Refreshed
            }
            Err(e) => {
                let failure = RefreshFailure::from_error(&e, Utc::now());
                warn!(kind = %failure.kind, error = %e, "Refresh failed");
                if let Some(body) = e.body_excerpt() {
                    debug!(body, "Unparseable feed body");
                }

                let last_good = self.cell.current().await.snapshot().cloned();
                let kind = failure.kind;
                self.cell
                    .publish(DashboardState::Failed { failure, last_good })
                    .await;
                TickOutcome::Failed(kind)
            }
        }
    }

    /// Tick every `period`, starting immediately.
    ///
    /// Each tick runs on its own task, so a refresh slower than `period`
    /// makes the following ticks find the guard taken and skip. Aborting
    /// the returned handle also cancels any tick still in flight.
    pub fn spawn(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            // Dropping the set aborts its tasks
            let mut ticks = JoinSet::new();
            loop {
                interval.tick().await;
                while ticks.try_join_next().is_some() {}

                let this = Arc::clone(&self);
                ticks.spawn(async move {
                    this.tick().await;
                });
            }
        })
    }
}
