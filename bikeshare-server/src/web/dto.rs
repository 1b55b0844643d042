//! Data transfer objects for the JSON API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gbfs::ErrorKind;
use crate::present::{MapCenter, MapMarker, TableRow, TableSort};
use crate::refresh::{DashboardState, RefreshFailure};
use crate::station::Summary;

/// Query parameters for sorted station listings.
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    /// `name`, `bikes` or `docks`
    pub sort: Option<String>,

    /// `asc` or `desc`
    pub order: Option<String>,
}

impl SortQuery {
    pub fn table_sort(&self) -> Result<TableSort, crate::present::InvalidSort> {
        TableSort::parse(self.sort.as_deref(), self.order.as_deref())
    }
}

/// A refresh failure as reported to API clients.
#[derive(Debug, Serialize)]
pub struct FailureResult {
    pub kind: ErrorKind,

    /// Underlying error text
    pub message: String,

    /// Human-readable banner text
    pub display: String,

    /// When the failed refresh finished
    pub at: DateTime<Utc>,
}

impl FailureResult {
    pub fn from_failure(failure: &RefreshFailure) -> Self {
        Self {
            kind: failure.kind,
            message: failure.message.clone(),
            display: failure.display_message(),
            at: failure.at,
        }
    }
}

/// Response for `GET /api/dashboard`.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// `pending`, `ok` or `error`
    pub status: &'static str,

    /// True when the data below predates a failed refresh
    pub stale: bool,

    /// When the data below was fetched
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Publisher timestamp of the status feed (unix seconds)
    pub feed_last_updated: Option<i64>,

    pub summary: Option<Summary>,
    pub markers: Vec<MapMarker>,
    pub map_center: Option<MapCenter>,
    pub table_rows: Vec<TableRow>,

    /// Present when the latest refresh failed
    pub error: Option<FailureResult>,
}

impl DashboardResponse {
    pub fn from_state(state: &DashboardState) -> Self {
        let snapshot = state.snapshot();

        Self {
            status: state.status_label(),
            stale: state.is_stale(),
            refreshed_at: snapshot.map(|s| s.refreshed_at),
            feed_last_updated: snapshot.and_then(|s| s.feed_last_updated),
            summary: snapshot.map(|s| s.summary),
            markers: snapshot.map(|s| s.markers.clone()).unwrap_or_default(),
            map_center: snapshot.and_then(|s| s.map_center),
            table_rows: snapshot.map(|s| s.table_rows.clone()).unwrap_or_default(),
            error: state.failure().map(FailureResult::from_failure),
        }
    }
}

/// Response for `GET /api/stations`.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    pub stale: bool,
    pub sort: String,
    pub order: &'static str,
    pub rows: Vec<TableRow>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::TimeZone;
    use serde_json::json;

    use crate::refresh::Snapshot;
    use crate::station::{MergedStation, StationId};

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
    }

    fn snapshot() -> Arc<Snapshot> {
        let stations = vec![MergedStation {
            id: StationId::new("7421"),
            name: "Pacific & Cathcart".into(),
            lat: 36.97,
            lon: -122.02,
            bikes_available: 6,
            docks_available: 8,
        }];
        Arc::new(Snapshot::build(stations, Some(1760572830), at()))
    }

    #[test]
    fn pending_response() {
        let value = serde_json::to_value(DashboardResponse::from_state(&DashboardState::Pending))
            .unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["stale"], false);
        assert_eq!(value["summary"], json!(null));
        assert_eq!(value["markers"], json!([]));
        assert_eq!(value["error"], json!(null));
    }

    #[test]
    fn ready_response() {
        let value =
            serde_json::to_value(DashboardResponse::from_state(&DashboardState::Ready(snapshot())))
                .unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["refreshed_at"], "2026-10-16T12:00:00Z");
        assert_eq!(value["feed_last_updated"], 1760572830);
        assert_eq!(
            value["summary"],
            json!({
                "total_bikes": 6,
                "total_docks": 8,
                "empty_stations": 0,
                "full_stations": 0,
                "online_stations": 1
            })
        );
        assert_eq!(value["markers"][0]["label"], "6");
        assert_eq!(
            value["table_rows"],
            json!([{"name": "Pacific & Cathcart", "bikes": 6, "docks": 8}])
        );
        assert_eq!(value["map_center"]["zoom"], 13);
    }

    #[test]
    fn stale_error_response_keeps_data() {
        let state = DashboardState::Failed {
            failure: RefreshFailure {
                kind: ErrorKind::Network,
                message: "HTTP 503 from https://x.test/gbfs.json".into(),
                at: at(),
            },
            last_good: Some(snapshot()),
        };

        let value = serde_json::to_value(DashboardResponse::from_state(&state)).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["stale"], true);
        assert_eq!(value["error"]["kind"], "network");
        assert_eq!(
            value["error"]["display"],
            "Error fetching data: HTTP 503 from https://x.test/gbfs.json"
        );
        assert_eq!(value["summary"]["total_bikes"], 6);
    }

    #[test]
    fn sort_query_parsing() {
        let query = SortQuery {
            sort: Some("bikes".into()),
            order: Some("desc".into()),
        };
        let sort = query.table_sort().unwrap();
        assert!(sort.descending);

        let query = SortQuery {
            sort: Some("colour".into()),
            order: None,
        };
        assert!(query.table_sort().is_err());
        assert_eq!(SortQuery::default().table_sort().unwrap(), TableSort::default());
    }
}
