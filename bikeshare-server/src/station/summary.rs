//! Network-wide availability totals.

use serde::Serialize;

use super::types::MergedStation;

/// Aggregate counts over all merged stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_bikes: u64,
    pub total_docks: u64,
    /// Stations with no bikes to rent.
    pub empty_stations: usize,
    /// Stations with no free docks.
    pub full_stations: usize,
    pub online_stations: usize,
}

/// Compute the summary for a merged station list.
///
/// An empty list yields an all-zero summary.
pub fn summarize(merged: &[MergedStation]) -> Summary {
    merged.iter().fold(
        Summary {
            online_stations: merged.len(),
            ..Summary::default()
        },
        |mut acc, station| {
            acc.total_bikes += u64::from(station.bikes_available);
            acc.total_docks += u64::from(station.docks_available);
            if station.bikes_available == 0 {
                acc.empty_stations += 1;
            }
            if station.docks_available == 0 {
                acc.full_stations += 1;
            }
            acc
        },
    )
}
