//! Google Geocoding API client
//!
//! This module defines the provider seam used by the cache and the HTTP client
//! that talks to the Google Geocoding API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::Coordinates;

/// Base URL for the Google Geocoding API
pub const GOOGLE_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Errors that can occur when calling a geocoding provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection, TLS, decode, or client-side timeout)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Provider answered with a non-2xx HTTP status
    #[error("Provider returned HTTP status {0}")]
    Status(u16),

    /// Provider answered 2xx but reported a failure status in the body
    #[error("Provider rejected the request: {0}")]
    Rejected(String),

    /// Provider did not answer within the configured timeout
    #[error("Provider timed out after {0:?}")]
    Timeout(Duration),

    /// Provider answered successfully with zero results
    #[error("Provider returned no results")]
    NoResults,
}

/// A source of geocoding results
///
/// Implementations return every result the provider produced, in provider
/// order. An empty list is a valid answer; the cache decides what it means.
#[async_trait]
pub trait GeocodingProvider: Send + Sync {
    /// Geocode a free-form query restricted to a country (ISO 3166-1 alpha-2)
    async fn geocode(&self, query: &str, country: &str) -> Result<Vec<Coordinates>, ProviderError>;
}

/// Geocoding response envelope
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

/// Client for the Google Geocoding API
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http_client: Client,
    api_key: String,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl GoogleGeocoder {
    /// Creates a client against the public Google endpoint
    ///
    /// # Arguments
    /// * `api_key` - Google Maps API key
    /// * `timeout` - Upper bound for a single request
    ///
    /// # Returns
    /// * `Ok(GoogleGeocoder)` on success
    /// * `Err(ProviderError)` if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, timeout, GOOGLE_GEOCODE_BASE_URL)
    }

    /// Creates a client against a custom endpoint (for testing or proxies)
    pub fn with_base_url(
        api_key: impl Into<String>,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Converts a decoded response body into coordinates
    fn parse_response(response: GeocodeResponse) -> Result<Vec<Coordinates>, ProviderError> {
        match response.status.as_str() {
            "OK" => Ok(response
                .results
                .into_iter()
                .map(|result| result.geometry.location)
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            other => {
                let reason = match response.error_message {
                    Some(message) => format!("{}: {}", other, message),
                    None => other.to_string(),
                };
                Err(ProviderError::Rejected(reason))
            }
        }
    }
}

#[async_trait]
impl GeocodingProvider for GoogleGeocoder {
    async fn geocode(&self, query: &str, country: &str) -> Result<Vec<Coordinates>, ProviderError> {
        let components = format!("country:{}", country);
        debug!(query, country, "Sending geocode request");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("address", query),
                ("components", components.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body = response.json::<GeocodeResponse>().await?;
        Self::parse_response(body)
    }
}
