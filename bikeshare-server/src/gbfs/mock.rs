//! File-backed feed source for running without network access.
//!
//! Loads every `*.json` file in a directory and serves it as if it were
//! the live response for any URL whose last path segment is that file
//! name. A discovery document whose feeds point at
//! `https://anything/station_status.json` therefore resolves to the
//! `station_status.json` file next to it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::station::Station;

use super::convert::{
    FeedUrls, StatusFeed, parse_discovery, parse_station_information, parse_station_status,
};
use super::error::FeedError;
use super::source::FeedSource;

/// Errors loading mock data from disk.
#[derive(Debug, thiserror::Error)]
pub enum MockLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no mock feed files found in {0}")]
    Empty(String),
}

/// Mock feed source serving JSON files from a directory.
#[derive(Clone)]
pub struct MockFeedSource {
    /// File bodies keyed by file name (e.g. `gbfs.json`).
    files: Arc<RwLock<HashMap<String, String>>>,
}

impl MockFeedSource {
    /// Load all `.json` files from `data_dir`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, MockLoadError> {
        let files = load_dir(data_dir.as_ref())?;
        Ok(Self {
            files: Arc::new(RwLock::new(files)),
        })
    }

    /// Build a source from in-memory bodies.
    pub fn from_files<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let files = files
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            files: Arc::new(RwLock::new(files)),
        }
    }

    /// Replace one file body, e.g. to simulate an upstream change.
    pub async fn set_file(&self, name: impl Into<String>, body: impl Into<String>) {
        self.files.write().await.insert(name.into(), body.into());
    }

    /// Remove one file, so requests for it answer 404.
    pub async fn remove_file(&self, name: &str) {
        self.files.write().await.remove(name);
    }

    /// List loaded file names, sorted.
    pub async fn file_names(&self) -> Vec<String> {
        let files = self.files.read().await;
        let mut names: Vec<String> = files.keys().cloned().collect();
        names.sort();
        names
    }

    /// Reload mock data from disk (useful for development).
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), MockLoadError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.files.write().await = fresh;
        Ok(())
    }

    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        let name = file_name_for(url);
        let files = self.files.read().await;
        files.get(name).cloned().ok_or_else(|| FeedError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// The last path segment of a URL, ignoring any query string.
fn file_name_for(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

fn load_dir(data_dir: &Path) -> Result<HashMap<String, String>, MockLoadError> {
    let io_err = |source| MockLoadError::Io {
        path: data_dir.display().to_string(),
        source,
    };

    let mut files = HashMap::new();
    for entry in std::fs::read_dir(data_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        let body = std::fs::read_to_string(&path).map_err(|source| MockLoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        files.insert(name.to_string(), body);
    }

    if files.is_empty() {
        return Err(MockLoadError::Empty(data_dir.display().to_string()));
    }

    Ok(files)
}

impl FeedSource for MockFeedSource {
    async fn fetch_feed_urls(
        &self,
        discovery_url: &str,
        language: &str,
    ) -> Result<FeedUrls, FeedError> {
        let body = self.get_text(discovery_url).await?;
        parse_discovery(&body, discovery_url, language)
    }

    async fn fetch_stations(&self, info_url: &str) -> Result<Vec<Station>, FeedError> {
        let body = self.get_text(info_url).await?;
        parse_station_information(&body, info_url)
    }

    async fn fetch_status(&self, status_url: &str) -> Result<StatusFeed, FeedError> {
        let body = self.get_text(status_url).await?;
        parse_station_status(&body, status_url)
    }
}
