//! One pass of fetch, merge and derive.

use chrono::Utc;
use futures::future::try_join;

use crate::gbfs::{FeedError, FeedSource};
use crate::station::merge;

use super::snapshot::Snapshot;

/// Fetch both station feeds and build a [`Snapshot`].
///
/// The two sub-feeds are fetched concurrently; both must succeed.
#[tracing::instrument(skip(source))]
pub async fn run_pipeline<S: FeedSource>(
    source: &S,
    discovery_url: &str,
    language: &str,
) -> Result<Snapshot, FeedError> {
    let urls = source.fetch_feed_urls(discovery_url, language).await?;

    let (stations, status) = try_join(
        source.fetch_stations(&urls.info_url),
        source.fetch_status(&urls.status_url),
    )
    .await?;

    let merged = merge(&stations, &status.stations);
    Ok(Snapshot::build(merged, status.last_updated, Utc::now()))
}
