//! My Perfect Meals geocoding cache
//!
//! Resolves US ZIP codes to coordinates for restaurant search, memoizing
//! provider results for a TTL and degrading to a static fallback table when
//! the provider is unavailable.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;

pub use cache::{CacheStats, GeoCache};
pub use config::GeoConfig;
pub use data::{Coordinates, PostalCode, Resolved, Source};
