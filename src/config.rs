//! Geocoding cache configuration
//!
//! Settings are read from `GEOCODE_*` environment variables. Every variable is
//! optional: without an API key the cache runs in fallback-only mode, and a
//! malformed numeric override is logged and replaced by its default.

use std::env;
use std::time::Duration;

use tracing::warn;

use crate::data::google::GOOGLE_GEOCODE_BASE_URL;

/// Environment variable holding the provider API key
pub const ENV_API_KEY: &str = "GEOCODE_API_KEY";
/// Environment variable overriding the cache TTL in milliseconds
pub const ENV_TTL_MS: &str = "GEOCODE_TTL_MS";
/// Environment variable overriding the provider timeout in milliseconds
pub const ENV_TIMEOUT_MS: &str = "GEOCODE_TIMEOUT_MS";
/// Environment variable overriding the provider endpoint
pub const ENV_BASE_URL: &str = "GEOCODE_BASE_URL";

/// Default freshness window: 24 hours
pub const DEFAULT_TTL_MS: u64 = 86_400_000;
/// Default provider timeout: 5 seconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Configuration for a `GeoCache` instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoConfig {
    /// Provider credential; `None` forces fallback-only operation
    pub api_key: Option<String>,
    /// Maximum age of a cache entry before it is refreshed
    pub ttl: Duration,
    /// Upper bound for a single provider call
    pub timeout: Duration,
    /// Provider endpoint
    pub base_url: String,
    /// ISO country code used to restrict provider results
    pub country: String,
    /// Text appended to the postal code to disambiguate the query
    pub country_qualifier: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            ttl: Duration::from_millis(DEFAULT_TTL_MS),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            base_url: GOOGLE_GEOCODE_BASE_URL.to_string(),
            country: "US".to_string(),
            country_qualifier: "USA".to_string(),
        }
    }
}

impl GeoConfig {
    /// Loads configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    ///
    /// Used by `from_env` and by tests that must not touch process state.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_key = lookup(ENV_API_KEY)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let ttl = parse_millis(ENV_TTL_MS, lookup(ENV_TTL_MS)).unwrap_or(defaults.ttl);
        let timeout = parse_millis(ENV_TIMEOUT_MS, lookup(ENV_TIMEOUT_MS)).unwrap_or(defaults.timeout);

        let base_url = lookup(ENV_BASE_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.base_url);

        Self {
            api_key,
            ttl,
            timeout,
            base_url,
            ..defaults
        }
    }

    /// Sets the provider API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the cache TTL
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sets the provider timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the provider endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the country filter and the qualifier appended to queries
    pub fn with_country(mut self, country: impl Into<String>, qualifier: impl Into<String>) -> Self {
        self.country = country.into();
        self.country_qualifier = qualifier.into();
        self
    }

    /// Whether the provider path is available at all
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Parses an optional millisecond override, warning on garbage
fn parse_millis(key: &str, raw: Option<String>) -> Option<Duration> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Ignoring malformed duration override");
            None
        }
    }
}
