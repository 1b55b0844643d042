//! Server configuration.
//!
//! Everything can be set from the environment; see [`DashboardConfig::from_env`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Santa Cruz BCycle discovery document.
pub const DEFAULT_DISCOVERY_URL: &str = "https://gbfs.bcycle.com/bcycle_santacruz/gbfs.json";

/// Default dashboard title.
pub const DEFAULT_TITLE: &str = "Santa Cruz BCycle Dashboard";

/// Default refresh interval: one minute.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Longest accepted refresh interval: one day. The page polls on the same
/// cadence and browser timers overflow past ~24.8 days.
pub const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 8050);
const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Errors from reading configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// GBFS discovery document URL
    pub discovery_url: String,
    /// Language key under `data` in the discovery document
    pub language: String,
    /// Time between refresh ticks
    pub refresh_interval: Duration,
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Page heading
    pub title: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// When set, serve feed files from this directory instead of the network
    pub mock_dir: Option<PathBuf>,
}

impl DashboardConfig {
    pub const DISCOVERY_URL_VAR: &'static str = "BIKESHARE_DISCOVERY_URL";
    pub const LANGUAGE_VAR: &'static str = "BIKESHARE_FEED_LANGUAGE";
    pub const REFRESH_SECS_VAR: &'static str = "BIKESHARE_REFRESH_SECS";
    pub const BIND_ADDR_VAR: &'static str = "BIKESHARE_BIND_ADDR";
    pub const TITLE_VAR: &'static str = "BIKESHARE_TITLE";
    pub const STATIC_DIR_VAR: &'static str = "BIKESHARE_STATIC_DIR";
    pub const MOCK_DIR_VAR: &'static str = "BIKESHARE_MOCK_DIR";

    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary lookup function.
    ///
    /// Unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup(Self::DISCOVERY_URL_VAR) {
            config.discovery_url = non_empty(Self::DISCOVERY_URL_VAR, url)?;
        }

        if let Some(language) = lookup(Self::LANGUAGE_VAR) {
            config.language = non_empty(Self::LANGUAGE_VAR, language)?;
        }

        if let Some(secs) = lookup(Self::REFRESH_SECS_VAR) {
            let parsed = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| (1..=MAX_REFRESH_INTERVAL.as_secs()).contains(s))
                .ok_or(ConfigError::Invalid {
                    var: Self::REFRESH_SECS_VAR,
                    expected: "number of seconds between 1 and 86400",
                    value: secs,
                })?;
            config.refresh_interval = Duration::from_secs(parsed);
        }

        if let Some(addr) = lookup(Self::BIND_ADDR_VAR) {
            config.bind_addr =
                addr.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::Invalid {
                        var: Self::BIND_ADDR_VAR,
                        expected: "socket address",
                        value: addr.clone(),
                    })?;
        }

        if let Some(title) = lookup(Self::TITLE_VAR) {
            config.title = non_empty(Self::TITLE_VAR, title)?;
        }

        if let Some(dir) = lookup(Self::STATIC_DIR_VAR) {
            config.static_dir = PathBuf::from(non_empty(Self::STATIC_DIR_VAR, dir)?);
        }

        if let Some(dir) = lookup(Self::MOCK_DIR_VAR).filter(|d| !d.trim().is_empty()) {
            config.mock_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// Set the discovery URL.
    pub fn with_discovery_url(mut self, url: impl Into<String>) -> Self {
        self.discovery_url = url.into();
        self
    }

    /// Set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Serve feed files from a directory instead of the network.
    pub fn with_mock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.mock_dir = Some(dir.into());
        self
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_DISCOVERY_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            bind_addr: SocketAddr::from(DEFAULT_BIND_ADDR),
            title: DEFAULT_TITLE.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            mock_dir: None,
        }
    }
}

fn non_empty(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ConfigError::Empty { var })
    } else {
        Ok(trimmed.to_string())
    }
}
