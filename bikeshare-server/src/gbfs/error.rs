//! Feed error types.

use std::fmt;

use serde::Serialize;

/// Errors from fetching or parsing a GBFS feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The discovery document does not list a required feed
    #[error("feed discovery failed: no `{feed}` feed listed")]
    Discovery { feed: String },

    /// HTTP request failed (connection refused, DNS, reset, ...)
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Body is not JSON or does not have the expected shape
    #[error("parse error for {url}: {message}")]
    Parse {
        url: String,
        message: String,
        body: Option<String>,
    },

    /// Reserved: merging never fails today, invalid counts degrade to zero
    #[error("merge error: {0}")]
    Merge(String),
}

impl FeedError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FeedError::Discovery { .. } => ErrorKind::FeedDiscovery,
            FeedError::Network { .. } | FeedError::HttpStatus { .. } => ErrorKind::Network,
            FeedError::Parse { .. } => ErrorKind::Parse,
            FeedError::Merge(_) => ErrorKind::Merge,
        }
    }

    /// Start of the offending body, for parse errors that kept one.
    pub fn body_excerpt(&self) -> Option<&str> {
        match self {
            FeedError::Parse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub(crate) fn parse(url: &str, err: impl fmt::Display, body: &str) -> Self {
        FeedError::Parse {
            url: url.to_string(),
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }

    pub(crate) fn missing_path(url: &str, path: &str) -> Self {
        FeedError::Parse {
            url: url.to_string(),
            message: format!("missing `{path}`"),
            body: None,
        }
    }
}

/// Coarse error category shown to dashboard consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    FeedDiscovery,
    Network,
    Parse,
    Merge,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::FeedDiscovery => "feed discovery",
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::Merge => "merge",
        };
        f.write_str(label)
    }
}
