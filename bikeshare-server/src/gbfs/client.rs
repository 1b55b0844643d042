//! GBFS HTTP client.
//!
//! One GET per call. No retries and no timeout override: a slow upstream
//! simply holds the refresh guard until reqwest gives up.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::station::Station;

use super::convert::{
    FeedUrls, StatusFeed, parse_discovery, parse_station_information, parse_station_status,
};
use super::error::FeedError;
use super::source::FeedSource;

/// Default User-Agent sent to feed publishers.
const DEFAULT_USER_AGENT: &str = concat!("bikeshare-server/", env!("CARGO_PKG_VERSION"));

/// Configuration for the GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsConfig {
    /// User-Agent header value
    pub user_agent: String,
}

impl GbfsConfig {
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for GbfsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Live GBFS client.
#[derive(Debug, Clone)]
pub struct GbfsClient {
    http: reqwest::Client,
}

impl GbfsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GbfsConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        if let Ok(agent) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, agent);
        }

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self { http })
    }

    /// GET a URL and return the body, mapping transport and status failures.
    async fn get_text(&self, url: &str) -> Result<String, FeedError> {
        debug!(url, "Fetching feed");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FeedError::Network {
            url: url.to_string(),
            source,
        })?;

        debug!(url, bytes = body.len(), "Feed received");
        Ok(body)
    }
}

impl FeedSource for GbfsClient {
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
