//! In-memory geocoding cache
//!
//! This module provides `GeoCache`, which memoizes ZIP code lookups for a
//! configurable TTL (24 hours by default). When the geocoding provider is
//! unavailable it degrades to a static fallback table, and when that has no
//! entry either it returns `None` rather than an error.

mod clock;
mod geo_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use geo_cache::{CacheStats, GeoCache};
