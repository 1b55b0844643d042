//! Joining station metadata with live status.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use super::types::{MergedStation, RawCount, Station, StationId, StationStatus};

/// Inner-join stations with their statuses on station id.
///
/// Output follows the order of `stations`. Stations without a status and
/// statuses without a station are dropped. If `statuses` repeats an id, the
/// first occurrence wins.
pub fn merge(stations: &[Station], statuses: &[StationStatus]) -> Vec<MergedStation> {
    let mut by_id: HashMap<&StationId, &StationStatus> = HashMap::with_capacity(statuses.len());
    for status in statuses {
        by_id.entry(&status.id).or_insert(status);
    }

    let merged: Vec<MergedStation> = stations
        .iter()
        .filter_map(|station| {
            let status = by_id.get(&station.id)?;
            Some(MergedStation {
                id: station.id.clone(),
                name: station.name.clone(),
                lat: station.lat,
                lon: station.lon,
                bikes_available: coerce_count(&status.bikes_available),
                docks_available: coerce_count(&status.docks_available),
            })
        })
        .collect();

    debug!(
        stations = stations.len(),
        statuses = statuses.len(),
        merged = merged.len(),
        "Merged station feeds"
    );

    merged
}

/// Coerce a publisher-supplied count to a non-negative integer.
///
/// Integers and numeric strings are accepted, fractional values are
/// truncated toward zero and anything else (negative, non-numeric, null,
/// missing) becomes 0. Counts past `u32::MAX` saturate.
pub fn coerce_count(raw: &RawCount) -> u32 {
    match &raw.0 {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                clamp(u)
            } else {
                n.as_f64().map_or(0, from_float)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(u) = s.parse::<u64>() {
                clamp(u)
            } else {
                s.parse::<f64>().map_or(0, from_float)
            }
        }
        _ => 0,
    }
}

fn clamp(n: u64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn from_float(f: f64) -> u32 {
    if f.is_finite() && f > 0.0 {
        // `as` saturates at u32::MAX
        f.trunc() as u32
    } else {
        0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn make_stations(ids: &[u16]) -> Vec<Station> {
        ids.iter()
            .map(|id| Station {
                id: StationId::new(id.to_string()),
                name: format!("Station {id}"),
                lat: 36.9 + f64::from(*id) / 10_000.0,
                lon: -122.0,
            })
            .collect()
    }

    fn make_statuses(ids: &[u16]) -> Vec<StationStatus> {
        ids.iter()
            .map(|id| StationStatus::new(id.to_string(), u32::from(*id % 7), u32::from(*id % 5)))
            .collect()
    }

    /// Merge output as an order-independent set of (id, bikes, docks).
    fn as_set(merged: &[MergedStation]) -> BTreeSet<(StationId, u32, u32)> {
        merged
            .iter()
            .map(|m| (m.id.clone(), m.bikes_available, m.docks_available))
            .collect()
    }

    /// Distinct ids paired with an arbitrary permutation of the same ids.
    fn ids_with_permutation() -> impl Strategy<Value = (Vec<u16>, Vec<u16>)> {
        proptest::collection::btree_set(0u16..200, 0..40).prop_flat_map(|ids| {
            let ids: Vec<u16> = ids.into_iter().collect();
            (Just(ids.clone()), Just(ids).prop_shuffle())
        })
    }

    /// Non-numeric strings that must coerce to zero.
    fn junk_string() -> impl Strategy<Value = String> {
        "[a-zA-Z/ _-]{0,12}".prop_filter("must not parse as a number", |s| {
            s.trim().parse::<f64>().is_err()
        })
    }

    proptest! {
        #[test]
        fn merge_ignores_input_order(
            (info_ids, shuffled_info) in ids_with_permutation(),
            (status_ids, shuffled_status) in ids_with_permutation(),
        ) {
            let forward = merge(&make_stations(&info_ids), &make_statuses(&status_ids));
            let permuted = merge(&make_stations(&shuffled_info), &make_statuses(&shuffled_status));

            prop_assert_eq!(as_set(&forward), as_set(&permuted));
        }

        #[test]
        fn merge_keeps_exactly_shared_ids(
            info_ids in proptest::collection::btree_set(0u16..100, 0..30),
            status_ids in proptest::collection::btree_set(0u16..100, 0..30),
        ) {
            let info: Vec<u16> = info_ids.iter().copied().collect();
            let status: Vec<u16> = status_ids.iter().copied().collect();
            let merged = merge(&make_stations(&info), &make_statuses(&status));

            let expected: BTreeSet<String> = info_ids
                .intersection(&status_ids)
                .map(|id| id.to_string())
                .collect();
            let actual: BTreeSet<String> = merged.iter().map(|m| m.id.to_string()).collect();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn junk_counts_coerce_to_zero(bikes in junk_string(), docks in junk_string()) {
            let stations = make_stations(&[1]);
            let statuses = vec![StationStatus::new("1", bikes.as_str(), docks.as_str())];
            let merged = merge(&stations, &statuses);
            prop_assert_eq!(merged.len(), 1);
            prop_assert_eq!(merged[0].bikes_available, 0);
            prop_assert_eq!(merged[0].docks_available, 0);
        }

        #[test]
        fn numeric_strings_match_numbers(n in 0u32..100_000) {
            prop_assert_eq!(coerce_count(&RawCount::from(n.to_string().as_str())), n);
            prop_assert_eq!(coerce_count(&RawCount::from(n)), n);
        }
    }
}
