//! The feed source abstraction.

use std::future::Future;

use crate::station::Station;

use super::convert::{FeedUrls, StatusFeed};
use super::error::FeedError;

/// Something that can answer the three GBFS requests the dashboard makes.
///
/// This abstraction allows the refresh loop to be tested with canned data
/// and run offline against files on disk.
pub trait FeedSource: Send + Sync {
    /// Resolve the `station_information` and `station_status` URLs from
    /// the discovery document at `discovery_url`.
    fn fetch_feed_urls(
        &self,
        discovery_url: &str,
        language: &str,
    ) -> impl Future<Output = Result<FeedUrls, FeedError>> + Send;

    /// Fetch station metadata.
    fn fetch_stations(
        &self,
        info_url: &str,
    ) -> impl Future<Output = Result<Vec<Station>, FeedError>> + Send;

    /// Fetch live station availability.
    fn fetch_status(
        &self,
        status_url: &str,
    ) -> impl Future<Output = Result<StatusFeed, FeedError>> + Send;
}
