//! Parse GBFS response bodies into station types.
//!
//! Shared by the live client and the file-backed mock so both fail the
//! same way on the same input.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::station::{RawCount, Station, StationStatus};

use super::error::FeedError;
use super::types::{
    DiscoveryDocument, StationInformationDto, StationStatusDto, StationsEnvelope,
};

/// Feed name of the station metadata feed.
pub const STATION_INFORMATION: &str = "station_information";

/// Feed name of the live availability feed.
pub const STATION_STATUS: &str = "station_status";

/// Sub-feed URLs resolved from a discovery document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedUrls {
    pub info_url: String,
    pub status_url: String,
}

/// Parsed `station_status` feed.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusFeed {
    /// Publisher timestamp (unix seconds), when present and numeric.
    pub last_updated: Option<i64>,
    pub stations: Vec<StationStatus>,
}

/// Resolve the station feeds from a discovery document body.
///
/// `url` is only used for error reporting.
pub fn parse_discovery(body: &str, url: &str, language: &str) -> Result<FeedUrls, FeedError> {
    let doc: DiscoveryDocument =
        serde_json::from_str(body).map_err(|e| FeedError::parse(url, e, body))?;

    let feeds = doc
        .data
        .get(language)
        .ok_or_else(|| FeedError::missing_path(url, &format!("data.{language}.feeds")))?;

    let find = |name: &str| {
        feeds
            .feeds
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.url.clone())
            .ok_or_else(|| FeedError::Discovery {
                feed: name.to_string(),
            })
    };

    Ok(FeedUrls {
        info_url: find(STATION_INFORMATION)?,
        status_url: find(STATION_STATUS)?,
    })
}

/// Parse a `station_information` body.
///
/// Rows without a usable id or coordinates are skipped.
pub fn parse_station_information(body: &str, url: &str) -> Result<Vec<Station>, FeedError> {
    let (_, rows) = parse_rows::<StationInformationDto>(body, url)?;

    Ok(rows
        .into_iter()
        .map(|s| Station {
            id: s.station_id,
            name: s.name,
            lat: s.lat,
            lon: s.lon,
        })
        .collect())
}

/// Parse a `station_status` body.
///
/// Rows without a usable id are skipped.
pub fn parse_station_status(body: &str, url: &str) -> Result<StatusFeed, FeedError> {
    let (last_updated, rows) = parse_rows::<StationStatusDto>(body, url)?;

    let stations = rows
        .into_iter()
        .map(|s| StationStatus {
            id: s.station_id,
            bikes_available: RawCount(s.num_bikes_available),
            docks_available: RawCount(s.num_docks_available),
        })
        .collect();

    Ok(StatusFeed {
        last_updated: last_updated.as_i64(),
        stations,
    })
}

/// Decode the envelope strictly and each row leniently.
///
/// A body that is not JSON or lacks `data.stations` is a parse error; a
/// single bad row is not.
fn parse_rows<T: DeserializeOwned>(body: &str, url: &str) -> Result<(Value, Vec<T>), FeedError> {
    let envelope: StationsEnvelope<Value> =
        serde_json::from_str(body).map_err(|e| FeedError::parse(url, e, body))?;

    let total = envelope.data.stations.len();
    let mut rows = Vec::with_capacity(total);
    for (index, row) in envelope.data.stations.into_iter().enumerate() {
        match serde_json::from_value::<T>(row) {
            Ok(parsed) => rows.push(parsed),
            Err(e) => debug!(url, index, error = %e, "Skipping malformed station row"),
        }
    }

    let skipped = total - rows.len();
    if skipped > 0 {
        warn!(url, skipped, kept = rows.len(), "Skipped malformed station rows");
    }

    Ok((envelope.last_updated, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::StationId;
    use serde_json::json;

    const URL: &str = "https://gbfs.example.com/gbfs.json";

    fn discovery(feeds: &[&str]) -> String {
        let feeds: Vec<_> = feeds
            .iter()
            .map(|name| json!({"name": name, "url": format!("https://gbfs.example.com/{name}.json")}))
            .collect();
        json!({"last_updated": 1, "ttl": 60, "data": {"en": {"feeds": feeds}}}).to_string()
    }

    #[test]
    fn discovery_resolves_both_feeds() {
        let body = discovery(&["system_information", STATION_INFORMATION, STATION_STATUS]);
        let urls = parse_discovery(&body, URL, "en").unwrap();
        assert_eq!(urls.info_url, "https://gbfs.example.com/station_information.json");
        assert_eq!(urls.status_url, "https://gbfs.example.com/station_status.json");
    }

    #[test]
    fn discovery_missing_status_feed() {
        let body = discovery(&[STATION_INFORMATION]);
        let err = parse_discovery(&body, URL, "en").unwrap_err();
        assert!(matches!(err, FeedError::Discovery { ref feed } if feed == STATION_STATUS));
    }

    #[test]
    fn discovery_missing_information_feed() {
        let body = discovery(&[STATION_STATUS]);
        let err = parse_discovery(&body, URL, "en").unwrap_err();
        assert!(matches!(err, FeedError::Discovery { ref feed } if feed == STATION_INFORMATION));
    }

    #[test]
    fn discovery_feed_names_match_exactly() {
        let body = discovery(&["Station_Information", "station_status_v2"]);
        let err = parse_discovery(&body, URL, "en").unwrap_err();
        assert!(matches!(err, FeedError::Discovery { .. }));
    }

    #[test]
    fn discovery_other_language() {
        let body = json!({"data": {"fr": {"feeds": [
            {"name": "station_information", "url": "i"},
            {"name": "station_status", "url": "s"}
        ]}}})
        .to_string();

        assert!(matches!(
            parse_discovery(&body, URL, "en"),
            Err(FeedError::Parse { .. })
        ));
        let urls = parse_discovery(&body, URL, "fr").unwrap();
        assert_eq!(urls.info_url, "i");
        assert_eq!(urls.status_url, "s");
    }

    #[test]
    fn discovery_not_json() {
        let err = parse_discovery("<html>oops</html>", URL, "en").unwrap_err();
        assert!(matches!(err, FeedError::Parse { .. }));
    }

    #[test]
    fn discovery_wrong_shape() {
        let body = json!({"data": {"en": {"feed": []}}}).to_string();
        assert!(matches!(
            parse_discovery(&body, URL, "en"),
            Err(FeedError::Parse { .. })
        ));
    }

    #[test]
    fn station_information_rows() {
        let body = json!({
            "last_updated": 1700000000,
            "data": {"stations": [
                {"station_id": "bcycle_santacruz_7421", "name": "Pacific & Front", "lat": 36.9707, "lon": -122.0258, "capacity": 12},
                {"station_id": 7422, "lat": 36.97, "lon": -122.03}
            ]}
        })
        .to_string();

        let stations = parse_station_information(&body, URL).unwrap();
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, StationId::new("bcycle_santacruz_7421"));
        assert_eq!(stations[0].name, "Pacific & Front");
        assert_eq!(stations[1].id, StationId::new("7422"));
        assert_eq!(stations[1].name, "");
    }

    #[test]
    fn station_information_missing_stations_path() {
        let body = json!({"data": {}}).to_string();
        assert!(matches!(
            parse_station_information(&body, URL),
            Err(FeedError::Parse { .. })
        ));
    }

    #[test]
    fn station_status_keeps_raw_counts() {
        let body = json!({
            "last_updated": 1700000060,
            "data": {"stations": [
                {"station_id": "a", "num_bikes_available": 4, "num_docks_available": "N/A"},
                {"station_id": "b"}
            ]}
        })
        .to_string();

        let feed = parse_station_status(&body, URL).unwrap();
        assert_eq!(feed.last_updated, Some(1700000060));
        assert_eq!(feed.stations.len(), 2);
        assert_eq!(feed.stations[0].bikes_available, RawCount(json!(4)));
        assert_eq!(feed.stations[0].docks_available, RawCount(json!("N/A")));
        assert_eq!(feed.stations[1].bikes_available, RawCount::default());
    }

    #[test]
    fn station_information_skips_rows_without_coordinates() {
        let body = json!({
            "data": {"stations": [
                {"station_id": "a", "name": "Good", "lat": 36.97, "lon": -122.02},
                {"station_id": "b", "name": "Null lat", "lat": null, "lon": -122.03},
                {"station_id": "c", "name": "No lon", "lat": 36.98},
                {"name": "No id", "lat": 36.99, "lon": -122.04},
                "not an object",
                {"station_id": "d", "name": "Also good", "lat": 36.96, "lon": -122.01}
            ]}
        })
        .to_string();

        let stations = parse_station_information(&body, URL).unwrap();
        let ids: Vec<&str> = stations.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "d"]);
    }

    #[test]
    fn station_status_skips_rows_without_id() {
        let body = json!({
            "last_updated": 1700000000,
            "data": {"stations": [
                {"num_bikes_available": 3, "num_docks_available": 4},
                {"station_id": null, "num_bikes_available": 1},
                {"station_id": "b", "num_bikes_available": 2, "num_docks_available": 5}
            ]}
        })
        .to_string();

        let feed = parse_station_status(&body, URL).unwrap();
        assert_eq!(feed.last_updated, Some(1700000000));
        assert_eq!(feed.stations.len(), 1);
        assert_eq!(feed.stations[0].id, StationId::new("b"));
    }

    #[test]
    fn station_status_non_numeric_timestamp() {
        let body = json!({
            "last_updated": "2024-01-01T00:00:00Z",
            "data": {"stations": []}
        })
        .to_string();

        let feed = parse_station_status(&body, URL).unwrap();
        assert_eq!(feed.last_updated, None);
        assert!(feed.stations.is_empty());
    }
}
