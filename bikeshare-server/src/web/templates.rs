//! Askama templates for the web frontend.

use askama::Template;

use crate::present::{SortColumn, TableRow, TableSort, sort_table_rows};
use crate::refresh::DashboardState;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Dashboard page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    /// Poll period for the page script, in milliseconds.
    pub refresh_ms: u128,
    pub panel: PanelView,
}

// ============================================================================
// Fragment Templates (AJAX responses, no base.html)
// ============================================================================

/// KPI strip, error banner and station table.
#[derive(Template)]
#[template(path = "dashboard_panel.html")]
pub struct DashboardPanelTemplate {
    pub panel: PanelView,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One headline number.
#[derive(Debug, Clone)]
pub struct KpiView {
    pub label: &'static str,
    pub value: String,
}

/// Everything the dashboard panel shows.
#[derive(Debug, Clone)]
pub struct PanelView {
    pub status: &'static str,
    /// Banner text when the latest refresh failed.
    pub error: Option<String>,
    /// Data shown is from an earlier refresh.
    pub stale: bool,
    pub refreshed_at: Option<String>,
    pub kpis: Vec<KpiView>,
    pub rows: Vec<TableRow>,
    pub sort: TableSort,
}

impl PanelView {
    /// Build from the published state, sorting rows as requested.
    ///
    /// A failed refresh with no earlier data shows only the error banner.
    pub fn from_state(state: &DashboardState, sort: TableSort) -> Self {
        let snapshot = state.snapshot();

        let kpis = snapshot
            .map(|s| {
                let summary = &s.summary;
                vec![
                    KpiView {
                        label: "Total Bikes",
                        value: summary.total_bikes.to_string(),
                    },
                    KpiView {
                        label: "Total Docks",
                        value: summary.total_docks.to_string(),
                    },
                    KpiView {
                        label: "Empty Stations",
                        value: summary.empty_stations.to_string(),
                    },
                    KpiView {
                        label: "Full Stations",
                        value: summary.full_stations.to_string(),
                    },
                    KpiView {
                        label: "Stations Online",
                        value: summary.online_stations.to_string(),
                    },
                ]
            })
            .unwrap_or_default();

        let mut rows = snapshot.map(|s| s.table_rows.clone()).unwrap_or_default();
        sort_table_rows(&mut rows, sort);

        Self {
            status: state.status_label(),
            error: state.failure().map(|f| f.display_message()),
            stale: state.is_stale(),
            refreshed_at: snapshot.map(|s| s.refreshed_at.format("%H:%M:%S UTC").to_string()),
            kpis,
            rows,
            sort,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }

    /// Order a header link should request: flips the current column,
    /// starts other columns ascending.
    pub fn next_order(&self, column: &str) -> &'static str {
        let is_current = column.parse::<SortColumn>().ok() == Some(self.sort.column);
        if is_current && !self.sort.descending {
            "desc"
        } else {
            "asc"
        }
    }

    /// Arrow shown next to the sorted column's header.
    pub fn sort_marker(&self, column: &str) -> &'static str {
        if column.parse::<SortColumn>().ok() != Some(self.sort.column) {
            ""
        } else if self.sort.descending {
            "▼"
        } else {
            "▲"
        }
    }
}
