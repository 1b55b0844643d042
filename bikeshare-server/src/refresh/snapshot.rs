//! Published dashboard state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::gbfs::{ErrorKind, FeedError};
use crate::present::{
    MapCenter, MapMarker, TableRow, map_center, to_map_markers, to_table_rows,
};
use crate::station::{MergedStation, Summary, summarize};

/// The result of one successful refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// When the refresh finished.
    pub refreshed_at: DateTime<Utc>,
    /// `last_updated` of the status feed, unix seconds.
    pub feed_last_updated: Option<i64>,
    pub stations: Vec<MergedStation>,
    pub summary: Summary,
    pub markers: Vec<MapMarker>,
    pub map_center: Option<MapCenter>,
    pub table_rows: Vec<TableRow>,
}

impl Snapshot {
    /// Derive summary and view data from a merged station list.
    pub fn build(
        stations: Vec<MergedStation>,
        feed_last_updated: Option<i64>,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            refreshed_at,
            feed_last_updated,
            summary: summarize(&stations),
            markers: to_map_markers(&stations),
            map_center: map_center(&stations),
            table_rows: to_table_rows(&stations),
            stations,
        }
    }
}

/// A failed refresh, in a form fit for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshFailure {
    pub kind: ErrorKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl RefreshFailure {
    pub fn from_error(err: &FeedError, at: DateTime<Utc>) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
            at,
        }
    }

    /// Banner text shown in place of the dashboard.
    pub fn display_message(&self) -> String {
        format!("Error fetching data: {}", self.message)
    }
}

/// What readers of the dashboard see.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DashboardState {
    /// No refresh has finished yet.
    #[default]
    Pending,

    /// The latest refresh succeeded.
    Ready(Arc<Snapshot>),

    /// The latest refresh failed. `last_good` is the most recent
    /// successful snapshot, if there has been one.
    Failed {
        failure: RefreshFailure,
        last_good: Option<Arc<Snapshot>>,
    },
}

impl DashboardState {
    /// The freshest data available: the current snapshot, or the last good
    /// one after a failure.
    pub fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            DashboardState::Pending => None,
            DashboardState::Ready(snapshot) => Some(snapshot),
            DashboardState::Failed { last_good, .. } => last_good.as_ref(),
        }
    }

    pub fn failure(&self) -> Option<&RefreshFailure> {
        match self {
            DashboardState::Failed { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Whether the data on offer predates the latest (failed) refresh.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            DashboardState::Failed {
                last_good: Some(_),
                ..
            }
        )
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            DashboardState::Pending => "pending",
            DashboardState::Ready(_) => "ok",
            DashboardState::Failed { .. } => "error",
        }
    }
}
