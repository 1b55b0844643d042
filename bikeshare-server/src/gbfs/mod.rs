//! GBFS (General Bikeshare Feed Specification) feed access.
//!
//! A system publishes a discovery document (`gbfs.json`) listing its
//! sub-feeds per language. The dashboard needs two of them:
//! - `station_information`: static metadata (name, coordinates)
//! - `station_status`: live counts of bikes and free docks
//!
//! Counts in `station_status` are kept as raw JSON here and coerced by
//! [`crate::station::merge`], so one malformed row never fails the feed.

mod client;
mod convert;
mod error;
mod mock;
mod source;
mod types;

pub use client::{GbfsClient, GbfsConfig};
pub use convert::{
    FeedUrls, STATION_INFORMATION, STATION_STATUS, StatusFeed, parse_discovery,
    parse_station_information, parse_station_status,
};
pub use error::{ErrorKind, FeedError};
pub use mock::{MockFeedSource, MockLoadError};
pub use source::FeedSource;
pub use types::{DiscoveryDocument, FeedEntry, LanguageFeeds};
