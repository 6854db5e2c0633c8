//! Core data models for the geocoding cache
//!
//! This module contains the types shared by the cache, the fallback table and
//! the provider client: validated postal codes, coordinates and provenance.

pub mod fallback;
pub mod google;

pub use fallback::{fallback_coordinates, FALLBACK_ZIPS};
pub use google::{GeocodingProvider, GoogleGeocoder, ProviderError};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of digits in a US ZIP code
pub const POSTAL_CODE_LEN: usize = 5;

/// Reasons a postal code is rejected before any lookup
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostalCodeError {
    /// Input was an empty string
    #[error("Postal code is empty")]
    Empty,

    /// Input did not have exactly five characters
    #[error("Postal code must be 5 digits, got {0} characters")]
    WrongLength(usize),

    /// Input contained something other than ASCII digits
    #[error("Postal code contains non-digit characters: '{0}'")]
    NonDigit(String),
}

/// A US ZIP code that has passed validation
///
/// Only constructible through [`PostalCode::parse`], so holding one means the
/// value is exactly five ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validates a raw postal code string
    ///
    /// Input is not trimmed; surrounding whitespace makes the code invalid.
    ///
    /// # Returns
    /// * `Ok(PostalCode)` if the input is exactly five ASCII digits
    /// * `Err(PostalCodeError)` describing the first problem found
    pub fn parse(raw: &str) -> Result<Self, PostalCodeError> {
        if raw.is_empty() {
            return Err(PostalCodeError::Empty);
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PostalCodeError::NonDigit(raw.to_string()));
        }
        if raw.len() != POSTAL_CODE_LEN {
            return Err(PostalCodeError::WrongLength(raw.len()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A geographic point as returned by the provider or the fallback table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Which data source produced a resolved value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from a fresh cache entry
    Cache,
    /// Freshly fetched from the geocoding provider
    Provider,
    /// Taken from the static fallback table
    Fallback,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Cache => "cache",
            Source::Provider => "provider",
            Source::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Coordinates tagged with their provenance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    pub coordinates: Coordinates,
    pub source: Source,
}
