//! Static fallback coordinates for common ZIP codes
//!
//! Consulted only when the live geocoding provider is unavailable, rejects the
//! request, or no API key is configured. The table is never mutated.

use super::{Coordinates, PostalCode};

/// A hand-curated ZIP code to coordinate mapping
#[derive(Debug, Clone, Copy)]
pub struct FallbackZip {
    /// Five-digit ZIP code
    pub zip: &'static str,
    /// City the ZIP code belongs to, for readability only
    pub city: &'static str,
    /// Centroid of the ZIP code area
    pub coordinates: Coordinates,
}

/// Known-good coordinates for frequently searched ZIP codes
pub static FALLBACK_ZIPS: [FallbackZip; 12] = [
    FallbackZip {
        zip: "90210",
        city: "Beverly Hills, CA",
        coordinates: Coordinates::new(34.0901, -118.4093),
    },
    FallbackZip {
        zip: "10001",
        city: "New York, NY",
        coordinates: Coordinates::new(40.7506, -73.9972),
    },
    FallbackZip {
        zip: "60601",
        city: "Chicago, IL",
        coordinates: Coordinates::new(41.8858, -87.6181),
    },
    FallbackZip {
        zip: "94102",
        city: "San Francisco, CA",
        coordinates: Coordinates::new(37.7793, -122.4193),
    },
    FallbackZip {
        zip: "33101",
        city: "Miami, FL",
        coordinates: Coordinates::new(25.7791, -80.1978),
    },
    FallbackZip {
        zip: "98101",
        city: "Seattle, WA",
        coordinates: Coordinates::new(47.6114, -122.3305),
    },
    FallbackZip {
        zip: "02108",
        city: "Boston, MA",
        coordinates: Coordinates::new(42.3572, -71.0649),
    },
    FallbackZip {
        zip: "78701",
        city: "Austin, TX",
        coordinates: Coordinates::new(30.2713, -97.7426),
    },
    FallbackZip {
        zip: "80202",
        city: "Denver, CO",
        coordinates: Coordinates::new(39.7508, -104.9966),
    },
    FallbackZip {
        zip: "30303",
        city: "Atlanta, GA",
        coordinates: Coordinates::new(33.7525, -84.3888),
    },
    FallbackZip {
        zip: "85004",
        city: "Phoenix, AZ",
        coordinates: Coordinates::new(33.4515, -112.0685),
    },
    FallbackZip {
        zip: "97201",
        city: "Portland, OR",
        coordinates: Coordinates::new(45.5075, -122.6896),
    },
];

/// Looks up a ZIP code in the fallback table
///
/// # Returns
///
/// Returns `Some(Coordinates)` if the ZIP code is seeded, `None` otherwise
pub fn fallback_coordinates(zip: &PostalCode) -> Option<Coordinates> {
    FALLBACK_ZIPS
        .iter()
        .find(|entry| entry.zip == zip.as_str())
        .map(|entry| entry.coordinates)
}
