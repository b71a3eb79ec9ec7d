//! Runtime configuration read from the environment

use std::path::PathBuf;

/// Base URL used outside production when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Directory holding the local cache when `TRACKER_DATA_DIR` is unset
pub const DEFAULT_DATA_DIR: &str = ".tracker-data";

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Explicitly configured remote base URL
    pub api_base_url: Option<String>,
    /// Production deployments only sync when a base URL is configured
    pub production: bool,
    /// Directory backing the local storage
    pub data_dir: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            production: false,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

fn env_flag(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: bool) -> bool {
    match lookup(name) {
        Some(raw) => parse_flag(&raw).unwrap_or(default),
        None => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl TrackerConfig {
    /// Build the configuration from `TRACKER_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup("TRACKER_API_BASE_URL");
        let data_dir = lookup("TRACKER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            api_base_url,
            production: env_flag(&lookup, "TRACKER_PRODUCTION", false),
            data_dir,
        }
        .normalized()
    }

    /// Set the remote base URL
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self.normalized()
    }

    /// Mark the deployment as production
    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /// Set the local storage directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Base URL remote sync should talk to, or `None` when sync is disabled.
    pub fn sync_base_url(&self) -> Option<String> {
        match &self.api_base_url {
            Some(url) => Some(url.clone()),
            None if self.production => None,
            None => Some(DEFAULT_API_BASE_URL.to_string()),
        }
    }

    fn normalized(mut self) -> Self {
        self.api_base_url = self
            .api_base_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        self
    }
}
