//! Integration tests for the Google geocoding client and the cache on top of it
//!
//! A wiremock server stands in for the Google Geocoding API.

use std::time::Duration;

use mpm_geocache::data::{GeocodingProvider, GoogleGeocoder, ProviderError};
use mpm_geocache::{Coordinates, GeoCache, GeoConfig, Source};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";

fn ok_body(lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "results": [
            {
                "formatted_address": "Beverly Hills, CA 90210, USA",
                "geometry": { "location": { "lat": lat, "lng": lng } }
            }
        ],
        "status": "OK"
    })
}

fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), GEOCODE_PATH)
}

fn config_for(server: &MockServer) -> GeoConfig {
    GeoConfig::default()
        .with_api_key("test-key")
        .with_base_url(endpoint(server))
}

#[tokio::test]
async fn test_geocoder_sends_query_country_filter_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .and(query_param("address", "90210, USA"))
        .and(query_param("components", "country:US"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(34.103, -118.4105)))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::with_base_url("test-key", Duration::from_secs(5), endpoint(&server))
        .expect("Client should build");
    let results = geocoder
        .geocode("90210, USA", "US")
        .await
        .expect("Geocode should succeed");

    assert_eq!(results, vec![Coordinates::new(34.103, -118.4105)]);
}

#[tokio::test]
async fn test_geocoder_reports_http_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::with_base_url("k", Duration::from_secs(5), endpoint(&server))
        .expect("Client should build");
    let result = geocoder.geocode("90210, USA", "US").await;

    assert!(matches!(result, Err(ProviderError::Status(503))));
}

#[tokio::test]
async fn test_geocoder_reports_rejected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error_message": "The provided API key is invalid.",
            "results": [],
            "status": "REQUEST_DENIED"
        })))
        .mount(&server)
        .await;

    let geocoder = GoogleGeocoder::with_base_url("bad", Duration::from_secs(5), endpoint(&server))
        .expect("Client should build");
    let result = geocoder.geocode("90210, USA", "US").await;

    assert!(matches!(result, Err(ProviderError::Rejected(_))));
}

#[tokio::test]
async fn test_cache_serves_second_lookup_without_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(40.7484, -73.9967)))
        .expect(1)
        .mount(&server)
        .await;

    let cache = GeoCache::from_config(config_for(&server)).expect("Cache should build");

    let first = cache.resolve_with_source("10001").await.expect("Should resolve");
    let second = cache.resolve_with_source("10001").await.expect("Should resolve");

    assert_eq!(first.source, Source::Provider);
    assert_eq!(second.source, Source::Cache);
    assert_eq!(first.coordinates, second.coordinates);
    assert_eq!(first.coordinates, Coordinates::new(40.7484, -73.9967));
}

#[tokio::test]
async fn test_cache_falls_back_when_provider_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let cache = GeoCache::from_config(config_for(&server)).expect("Cache should build");

    // Fallback hit is cached, so repeating it does not reach the server
    assert_eq!(
        cache.resolve("90210").await,
        Some(Coordinates::new(34.0901, -118.4093))
    );
    assert_eq!(
        cache.resolve("90210").await,
        Some(Coordinates::new(34.0901, -118.4093))
    );
    assert_eq!(cache.resolve("00000").await, None);
}

#[tokio::test]
async fn test_cache_treats_zero_results_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "results": [], "status": "ZERO_RESULTS" })),
        )
        .mount(&server)
        .await;

    let cache = GeoCache::from_config(config_for(&server)).expect("Cache should build");

    let resolved = cache.resolve_with_source("90210").await.expect("Should fall back");
    assert_eq!(resolved.source, Source::Fallback);
    assert_eq!(cache.resolve("00000").await, None);
}

#[tokio::test]
async fn test_cache_falls_back_on_slow_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(GEOCODE_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(0.0, 0.0))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = config_for(&server).with_timeout(Duration::from_millis(100));
    let cache = GeoCache::from_config(config).expect("Cache should build");

    let resolved = cache.resolve_with_source("90210").await.expect("Should fall back");
    assert_eq!(resolved.source, Source::Fallback);
    assert_eq!(cache.stats().provider_failures, 1);
}

#[tokio::test]
async fn test_malformed_zip_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(1.0, 1.0)))
        .expect(0)
        .mount(&server)
        .await;

    let cache = GeoCache::from_config(config_for(&server)).expect("Cache should build");

    assert_eq!(cache.resolve("abcde").await, None);
    assert_eq!(cache.resolve("1234").await, None);
}
