//! Map and table projections of merged station data.
//!
//! Pure functions; aggregation lives in [`crate::station::summarize`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::station::MergedStation;

/// Zoom level the dashboard map opens at.
pub const DEFAULT_MAP_ZOOM: u8 = 13;

/// A station pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    /// Short text drawn next to the pin (bikes available).
    pub label: String,
    /// Multi-line popup text, lines separated by `\n`.
    pub hover_text: String,
}

/// Where to center the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

/// A row of the station table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub name: String,
    pub bikes: u32,
    pub docks: u32,
}

pub fn to_map_markers(merged: &[MergedStation]) -> Vec<MapMarker> {
    merged
        .iter()
        .map(|s| MapMarker {
            lat: s.lat,
            lon: s.lon,
            label: s.bikes_available.to_string(),
            hover_text: format!(
                "{}\nBikes: {}\nDocks: {}",
                s.name, s.bikes_available, s.docks_available
            ),
        })
        .collect()
}

pub fn to_table_rows(merged: &[MergedStation]) -> Vec<TableRow> {
    merged
        .iter()
        .map(|s| TableRow {
            name: s.name.clone(),
            bikes: s.bikes_available,
            docks: s.docks_available,
        })
        .collect()
}

/// Mean position of all stations, or `None` when there are none.
pub fn map_center(merged: &[MergedStation]) -> Option<MapCenter> {
    if merged.is_empty() {
        return None;
    }
    let n = merged.len() as f64;
    let (lat, lon) = merged
        .iter()
        .fold((0.0, 0.0), |(lat, lon), s| (lat + s.lat, lon + s.lon));

    Some(MapCenter {
        lat: lat / n,
        lon: lon / n,
        zoom: DEFAULT_MAP_ZOOM,
    })
}

/// Column to sort the station table by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    Name,
    Bikes,
    Docks,
}

/// Error returned when parsing an unknown sort column or order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort {what}: {value}")]
pub struct InvalidSort {
    what: &'static str,
    value: String,
}

impl FromStr for SortColumn {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "name" => Ok(SortColumn::Name),
            "bikes" => Ok(SortColumn::Bikes),
            "docks" => Ok(SortColumn::Docks),
            _ => Err(InvalidSort {
                what: "column",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortColumn::Name => "name",
            SortColumn::Bikes => "bikes",
            SortColumn::Docks => "docks",
        })
    }
}

/// Table ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSort {
    pub column: SortColumn,
    pub descending: bool,
}

impl TableSort {
    /// Build from `column` and `order` query values (`asc` / `desc`).
    pub fn parse(column: Option<&str>, order: Option<&str>) -> Result<Self, InvalidSort> {
        let column = column.map(str::parse::<SortColumn>).transpose()?.unwrap_or_default();
        let descending = match order.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(other) => {
                return Err(InvalidSort {
                    what: "order",
                    value: other.to_string(),
                });
            }
        };
        Ok(Self { column, descending })
    }
}

/// Stable sort of table rows. Ties keep their feed order.
pub fn sort_table_rows(rows: &mut [TableRow], sort: TableSort) {
    rows.sort_by(|a, b| {
        let ord = match sort.column {
            SortColumn::Name => compare_names(&a.name, &b.name),
            SortColumn::Bikes => a.bikes.cmp(&b.bikes),
            SortColumn::Docks => a.docks.cmp(&b.docks),
        };
        if sort.descending { ord.reverse() } else { ord }
    });
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
