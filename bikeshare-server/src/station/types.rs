//! Station types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A GBFS station identifier.
///
/// Publishers disagree on whether `station_id` is a string or a number.
/// Both forms deserialize to the same textual id, so `"42"` and `42` join.
///
/// # Examples
///
/// ```
/// use bikeshare_server::station::StationId;
///
/// let from_text: StationId = serde_json::from_str("\"bcycle_santacruz_7421\"").unwrap();
/// assert_eq!(from_text.as_str(), "bcycle_santacruz_7421");
///
/// let from_number: StationId = serde_json::from_str("42").unwrap();
/// assert_eq!(from_number, StationId::new("42"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => StationId(s),
            Raw::Signed(n) => StationId(n.to_string()),
            Raw::Unsigned(n) => StationId(n.to_string()),
        })
    }
}

/// Static station metadata from `station_information`.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// An availability count exactly as the publisher sent it.
///
/// Kept untyped until the merge step so a single malformed value degrades
/// to zero instead of failing the whole feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCount(pub serde_json::Value);

impl From<serde_json::Value> for RawCount {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl From<u32> for RawCount {
    fn from(n: u32) -> Self {
        Self(serde_json::Value::from(n))
    }
}

impl From<&str> for RawCount {
    fn from(s: &str) -> Self {
        Self(serde_json::Value::from(s))
    }
}

/// Live availability from `station_status`.
#[derive(Debug, Clone, PartialEq)]
pub struct StationStatus {
    pub id: StationId,
    pub bikes_available: RawCount,
    pub docks_available: RawCount,
}

impl StationStatus {
    pub fn new(
        id: impl Into<String>,
        bikes_available: impl Into<RawCount>,
        docks_available: impl Into<RawCount>,
    ) -> Self {
        Self {
            id: StationId::new(id),
            bikes_available: bikes_available.into(),
            docks_available: docks_available.into(),
        }
    }
}

/// A station joined with its status, counts already coerced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedStation {
    pub id: StationId,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub bikes_available: u32,
    pub docks_available: u32,
}
