//! GBFS wire types.
//!
//! Only the fields the dashboard reads are modelled; serde ignores the rest.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::station::StationId;

/// Top-level `gbfs.json` discovery document.
#[derive(Debug, Deserialize)]
pub struct DiscoveryDocument {
    /// Feed listings keyed by language code (e.g. `en`).
    pub data: HashMap<String, LanguageFeeds>,
}

/// Feeds published for one language.
#[derive(Debug, Deserialize)]
pub struct LanguageFeeds {
    pub feeds: Vec<FeedEntry>,
}

/// A named feed URL.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    pub name: String,
    pub url: String,
}

/// The `{ last_updated, ttl, data: { stations: [...] } }` wrapper shared by
/// `station_information` and `station_status`.
#[derive(Debug, Deserialize)]
pub struct StationsEnvelope<T> {
    /// Unix seconds in GBFS 1.x/2.x; left untyped because some publishers
    /// send a string.
    #[serde(default)]
    pub last_updated: Value,
    pub data: StationsData<T>,
}

#[derive(Debug, Deserialize)]
pub struct StationsData<T> {
    pub stations: Vec<T>,
}

/// A row of `station_information`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInformationDto {
    pub station_id: StationId,
    #[serde(default)]
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// A row of `station_status`.
///
/// Counts stay as raw JSON; see [`crate::station::coerce_count`].
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatusDto {
    pub station_id: StationId,
    #[serde(default)]
    pub num_bikes_available: Value,
    #[serde(default)]
    pub num_docks_available: Value,
}
