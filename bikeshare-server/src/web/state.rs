//! Application state for the web layer.

use std::sync::Arc;
use std::time::Duration;

use crate::refresh::StateCell;

/// Shared application state.
///
/// Handlers only read; the refresher owns writes to the cell.
#[derive(Clone)]
pub struct AppState {
    /// Latest published dashboard state
    pub cell: StateCell,

    /// Page heading
    pub title: Arc<str>,

    /// How often the page should poll for new data
    pub refresh_interval: Duration,
}

impl AppState {
    /// Create a new app state.
    pub fn new(cell: StateCell, title: impl Into<Arc<str>>, refresh_interval: Duration) -> Self {
        Self {
            cell,
            title: title.into(),
            refresh_interval,
        }
    }
}
