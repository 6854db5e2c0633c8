//! ZIP code to coordinates cache with TTL expiry and static fallback
//!
//! `GeoCache` sits in front of a `GeocodingProvider`. A lookup is served from
//! a fresh cache entry when possible, otherwise from the provider, otherwise
//! from the static fallback table. Every failure mode degrades to `None`;
//! nothing is raised to the caller.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::clock::{Clock, SystemClock};
use crate::config::GeoConfig;
use crate::data::google::GOOGLE_GEOCODE_BASE_URL;
use crate::data::{
    fallback_coordinates, Coordinates, GeocodingProvider, GoogleGeocoder, PostalCode,
    ProviderError, Resolved, Source,
};

/// Log value for lookups that found nothing anywhere
const MISS: &str = "miss";

/// A cached resolution
#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    coordinates: Coordinates,
    created_at: DateTime<Utc>,
}

/// Running totals, one per resolution path
#[derive(Debug, Default)]
struct Counters {
    cache_hits: AtomicU64,
    provider_hits: AtomicU64,
    fallback_hits: AtomicU64,
    misses: AtomicU64,
    validation_failures: AtomicU64,
    provider_failures: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Snapshot of cache activity since construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub cache_hits: u64,
    pub provider_hits: u64,
    pub fallback_hits: u64,
    pub misses: u64,
    pub validation_failures: u64,
    /// Provider calls that errored, timed out, or returned nothing
    pub provider_failures: u64,
    /// Entries currently stored, including stale ones not yet evicted
    pub entries: usize,
}

/// Geocoding cache for US ZIP codes
///
/// Owns its map, configuration and provider, so independently configured
/// instances can coexist. Safe to share across tasks behind an `Arc`.
///
/// Concurrent lookups of the same stale key are not coalesced: each one calls
/// the provider and the last write wins.
pub struct GeoCache {
    config: GeoConfig,
    provider: Option<Arc<dyn GeocodingProvider>>,
    clock: Arc<dyn Clock>,
    entries: DashMap<PostalCode, CacheEntry>,
    counters: Counters,
    /// Set once the missing-credential notice has been logged
    config_gap_logged: AtomicBool,
}

impl GeoCache {
    /// Creates a cache backed by `provider` and the system clock
    pub fn new(config: GeoConfig, provider: Arc<dyn GeocodingProvider>) -> Self {
        Self::with_clock(config, provider, Arc::new(SystemClock))
    }

    /// Creates a cache with a custom time source
    pub fn with_clock(
        config: GeoConfig,
        provider: Arc<dyn GeocodingProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::build(config, Some(provider), clock)
    }

    /// Creates a cache backed by the Google Geocoding API
    ///
    /// Without an API key in `config` no HTTP client is built and the cache
    /// serves fallback coordinates only.
    ///
    /// # Returns
    /// * `Ok(GeoCache)` on success
    /// * `Err(ProviderError)` if the HTTP client cannot be built
    pub fn from_config(config: GeoConfig) -> Result<Self, ProviderError> {
        let provider: Option<Arc<dyn GeocodingProvider>> = match &config.api_key {
            Some(key) if config.base_url == GOOGLE_GEOCODE_BASE_URL => {
                Some(Arc::new(GoogleGeocoder::new(key.clone(), config.timeout)?))
            }
            Some(key) => Some(Arc::new(GoogleGeocoder::with_base_url(
                key.clone(),
                config.timeout,
                config.base_url.clone(),
            )?)),
            None => None,
        };
        Ok(Self::build(config, provider, Arc::new(SystemClock)))
    }

    fn build(
        config: GeoConfig,
        provider: Option<Arc<dyn GeocodingProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            provider,
            clock,
            entries: DashMap::new(),
            counters: Counters::default(),
            config_gap_logged: AtomicBool::new(false),
        }
    }

    /// The configuration this cache was built with
    pub fn config(&self) -> &GeoConfig {
        &self.config
    }

    /// Resolves a ZIP code to coordinates
    ///
    /// Returns `None` for malformed input and for codes that neither the
    /// provider nor the fallback table can resolve.
    pub async fn resolve(&self, postal_code: &str) -> Option<Coordinates> {
        self.resolve_with_source(postal_code)
            .await
            .map(|resolved| resolved.coordinates)
    }

    /// Resolves a ZIP code and reports which source served it
    ///
    /// # Behavior
    /// - Rejects anything that is not exactly five ASCII digits, without I/O
    /// - Returns a fresh cache entry if one exists
    /// - Evicts a stale entry, then asks the provider (if an API key is set)
    /// - On provider failure, serves and caches the fallback table entry
    /// - Otherwise returns `None`
    pub async fn resolve_with_source(&self, postal_code: &str) -> Option<Resolved> {
        let zip = match PostalCode::parse(postal_code) {
            Ok(zip) => zip,
            Err(e) => {
                Counters::bump(&self.counters.validation_failures);
                warn!(input = postal_code, error = %e, "Validation failure, skipping lookup");
                return None;
            }
        };

        if let Some(coordinates) = self.lookup_fresh(&zip) {
            Counters::bump(&self.counters.cache_hits);
            info!(zip = %zip, source = %Source::Cache, "Resolved postal code");
            return Some(Resolved {
                coordinates,
                source: Source::Cache,
            });
        }

        if let Some(coordinates) = self.fetch_from_provider(&zip).await {
            self.store(&zip, coordinates);
            Counters::bump(&self.counters.provider_hits);
            info!(
                zip = %zip,
                source = %Source::Provider,
                lat = coordinates.lat,
                lng = coordinates.lng,
                "Resolved postal code"
            );
            return Some(Resolved {
                coordinates,
                source: Source::Provider,
            });
        }

        match fallback_coordinates(&zip) {
            Some(coordinates) => {
                self.store(&zip, coordinates);
                Counters::bump(&self.counters.fallback_hits);
                info!(zip = %zip, source = %Source::Fallback, "Resolved postal code");
                Some(Resolved {
                    coordinates,
                    source: Source::Fallback,
                })
            }
            None => {
                Counters::bump(&self.counters.misses);
                info!(zip = %zip, source = %MISS, "Postal code could not be resolved");
                None
            }
        }
    }

    /// Drops every cache entry, fresh or not
    pub fn clear_cache(&self) {
        self.entries.clear();
        debug!("Cache cleared");
    }

    /// Eagerly removes stale entries and returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = self.is_fresh(entry.created_at, now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Number of stored entries, including stale ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a snapshot of the activity counters
    pub fn stats(&self) -> CacheStats {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);
        CacheStats {
            cache_hits: load(&self.counters.cache_hits),
            provider_hits: load(&self.counters.provider_hits),
            fallback_hits: load(&self.counters.fallback_hits),
            misses: load(&self.counters.misses),
            validation_failures: load(&self.counters.validation_failures),
            provider_failures: load(&self.counters.provider_failures),
            entries: self.entries.len(),
        }
    }

    /// An entry from the future (clock skew) counts as fresh
    fn is_fresh(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - created_at)
            .to_std()
            .map_or(true, |age| age < self.config.ttl)
    }

    /// Returns cached coordinates if fresh, evicting the entry if stale
    fn lookup_fresh(&self, zip: &PostalCode) -> Option<Coordinates> {
        let now = self.clock.now();
        let entry = self.entries.get(zip).map(|entry| *entry)?;

        if self.is_fresh(entry.created_at, now) {
            return Some(entry.coordinates);
        }

        // Another task may have refreshed the key since the read above.
        if self
            .entries
            .remove_if(zip, |_, entry| !self.is_fresh(entry.created_at, now))
            .is_some()
        {
            debug!(zip = %zip, "Evicted stale cache entry");
        }
        None
    }

    fn store(&self, zip: &PostalCode, coordinates: Coordinates) {
        self.entries.insert(
            zip.clone(),
            CacheEntry {
                coordinates,
                created_at: self.clock.now(),
            },
        );
    }

    /// Makes one bounded provider call, returning the first result
    ///
    /// Any failure is logged and reported as `None`.
    async fn fetch_from_provider(&self, zip: &PostalCode) -> Option<Coordinates> {
        let provider = match &self.provider {
            Some(provider) if self.config.has_api_key() => provider,
            _ => {
                if !self.config_gap_logged.swap(true, Ordering::Relaxed) {
                    info!("No geocoding API key configured, serving fallback coordinates only");
                }
                return None;
            }
        };

        let query = format!("{}, {}", zip, self.config.country_qualifier);
        let outcome = match tokio::time::timeout(
            self.config.timeout,
            provider.geocode(&query, &self.config.country),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.config.timeout)),
        };

        match outcome.and_then(|results| results.into_iter().next().ok_or(ProviderError::NoResults)) {
            Ok(coordinates) => Some(coordinates),
            Err(e) => {
                Counters::bump(&self.counters.provider_failures);
                warn!(zip = %zip, error = %e, "Geocoding provider failed");
                None
            }
        }
    }
}
