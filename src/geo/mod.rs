//! Coordinates for positions: distance math, the geocoding fallback chain
//! and batch resolution for the map view.

pub mod batch;
pub mod cache;
pub mod cities;
pub mod distance;
pub mod provider;
pub mod resolver;
pub mod throttle;

pub use batch::{BatchGeocoder, BatchOutcome};
pub use cache::{cache_key, CacheEntry, CacheError, CachePolicy, FileCache, GeocodeCache, MemoryCache};
pub use distance::{distance_km, nearest, Nearby};
pub use provider::{GeocodeError, GeocodingProvider, PhotonGeocoder};
pub use resolver::{Geocoder, Lookup, Resolved, Source};
pub use throttle::{Slot, Throttle};
