//! Periodic refresh of the dashboard data.
//!
//! A [`Refresher`] runs the feed pipeline on a timer and publishes each
//! outcome into a [`StateCell`], which the web layer reads. At most one
//! pipeline run is in flight; ticks that arrive meanwhile are dropped.

mod pipeline;
mod refresher;
mod snapshot;
mod state;

pub use pipeline::run_pipeline;
pub use refresher::{RefreshState, Refresher, TickOutcome};
pub use snapshot::{DashboardState, RefreshFailure, Snapshot};
pub use state::StateCell;
