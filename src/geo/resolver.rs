use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use super::cache::{cache_key, CacheEntry, CachePolicy, GeocodeCache};
use super::cities;
use super::provider::GeocodingProvider;
use super::throttle::Throttle;
use crate::models::Coordinate;

/// Which tier answered a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    Cache,
    CityTable,
    Remote,
    RemoteCityOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Resolved {
    pub coordinate: Coordinate,
    pub source: Source,
}

/// Outcome of one lookup including how many remote calls it cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub resolved: Option<Resolved>,
    pub remote_calls: u8,
}

/// Address to coordinate resolver.
///
/// Tiers, first hit wins: cache, static city table, remote search on the
/// full address, remote search on the city alone. Every hit below the cache
/// is written back under `"{city}|{address}"`.
pub struct Geocoder {
    cache: Arc<dyn GeocodeCache>,
    provider: Arc<dyn GeocodingProvider>,
    policy: CachePolicy,
    throttle: Throttle,
}

impl Geocoder {
    pub fn new(cache: Arc<dyn GeocodeCache>, provider: Arc<dyn GeocodingProvider>) -> Self {
        Self {
            cache,
            provider,
            policy: CachePolicy::default(),
            throttle: Throttle::new(Duration::ZERO),
        }
    }

    pub fn with_policy(mut self, policy: CachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Minimum spacing between remote requests
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.throttle = Throttle::new(delay);
        self
    }

    pub async fn resolve(&self, city: &str, address: &str) -> Option<Resolved> {
        self.lookup(city, address).await.resolved
    }

    pub async fn lookup(&self, city: &str, address: &str) -> Lookup {
        let key = cache_key(city, address);

        if let Some(entry) = self.cache.get(&key) {
            if self.policy.is_fresh(&entry, Utc::now()) {
                debug!("Geocoding cache hit for {}", key);
                return Lookup {
                    resolved: Some(Resolved {
                        coordinate: entry.coordinate(),
                        source: Source::Cache,
                    }),
                    remote_calls: 0,
                };
            }
            debug!("Geocoding cache entry for {} is stale", key);
        }

        if let Some(coordinate) = cities::lookup(city) {
            return Lookup {
                resolved: Some(self.remember(&key, coordinate, Source::CityTable)),
                remote_calls: 0,
            };
        }

        let mut remote_calls = 0;
        let city = city.trim();
        let address = address.trim();

        if !address.is_empty() {
            let query = if city.is_empty() {
                address.to_string()
            } else {
                format!("{address}, {city}")
            };
            remote_calls += 1;
            if let Some(coordinate) = self.search(&query).await {
                return Lookup {
                    resolved: Some(self.remember(&key, coordinate, Source::Remote)),
                    remote_calls,
                };
            }
        }

        if !city.is_empty() {
            remote_calls += 1;
            if let Some(coordinate) = self.search(city).await {
                return Lookup {
                    resolved: Some(self.remember(&key, coordinate, Source::RemoteCityOnly)),
                    remote_calls,
                };
            }
        }

        debug!("No coordinates for {}", key);
        Lookup {
            resolved: None,
            remote_calls,
        }
    }

    async fn search(&self, query: &str) -> Option<Coordinate> {
        let _slot = self.throttle.wait().await;
        match self.provider.search(query).await {
            Ok(found) => found,
            Err(e) => {
                warn!("{} lookup failed for {:?}: {}", self.provider.provider_name(), query, e);
                None
            }
        }
    }

    fn remember(&self, key: &str, coordinate: Coordinate, source: Source) -> Resolved {
        if let Err(e) = self.cache.set(key, CacheEntry::new(coordinate, Utc::now())) {
            warn!("Could not store geocoding result for {}: {}", key, e);
        }
        Resolved { coordinate, source }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::geo::provider::{GeocodeError, GeocodingProvider};
    use crate::models::Coordinate;

    /// Canned answers keyed by query; records every query it sees
    #[derive(Default)]
    pub struct FakeProvider {
        pub answers: HashMap<String, Coordinate>,
        pub failing: Vec<String>,
        pub queries: Mutex<Vec<String>>,
        /// Simulated response time
        pub latency: Duration,
        /// Start and end of every call
        pub spans: Mutex<Vec<(Instant, Instant)>>,
    }

    impl FakeProvider {
        pub fn answering(pairs: &[(&str, Coordinate)]) -> Self {
            Self {
                answers: pairs.iter().map(|(q, c)| (q.to_string(), *c)).collect(),
                ..Self::default()
            }
        }

        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn spans(&self) -> Vec<(Instant, Instant)> {
            self.spans.lock().unwrap().clone()
        }

        pub fn calls(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GeocodingProvider for FakeProvider {
        async fn search(&self, query: &str) -> Result<Option<Coordinate>, GeocodeError> {
            let started = Instant::now();
            self.queries.lock().unwrap().push(query.to_string());
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            self.spans.lock().unwrap().push((started, Instant::now()));
            if self.failing.iter().any(|f| f == query) {
                return Err(GeocodeError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(self.answers.get(query).copied())
        }

        fn provider_name(&self) -> &'static str {
            "Fake"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::geo::cache::MemoryCache;

    const TISZAFURED: Coordinate = Coordinate {
        lat: 47.6167,
        lng: 20.7667,
    };
    const STREET: Coordinate = Coordinate {
        lat: 47.6201,
        lng: 20.7589,
    };

    fn setup(provider: FakeProvider) -> (Geocoder, Arc<MemoryCache>, Arc<FakeProvider>) {
        let cache = Arc::new(MemoryCache::new());
        let provider = Arc::new(provider);
        let geocoder = Geocoder::new(cache.clone(), provider.clone());
        (geocoder, cache, provider)
    }

    #[tokio::test]
    async fn city_table_hit_skips_network_and_is_cached() {
        let (geocoder, cache, provider) = setup(FakeProvider::default());

        let first = geocoder.resolve("Debrecen", "Kassai út 26.").await.unwrap();
        let second = geocoder.resolve("Debrecen", "Kassai út 26.").await.unwrap();

        assert_eq!(first.source, Source::CityTable);
        assert_eq!(second.source, Source::Cache);
        assert_eq!(first.coordinate, second.coordinate);
        assert!(provider.calls().is_empty());
        assert!(cache.get("Debrecen|Kassai út 26.").is_some());
    }

    #[tokio::test]
    async fn remote_result_is_reused() {
        let (geocoder, _, provider) =
            setup(FakeProvider::answering(&[("Fő utca 1., Tiszafüred", STREET)]));

        let first = geocoder.lookup("Tiszafüred", "Fő utca 1.").await;
        let second = geocoder.lookup("Tiszafüred", "Fő utca 1.").await;

        assert_eq!(first.resolved.unwrap().source, Source::Remote);
        assert_eq!(first.remote_calls, 1);
        assert_eq!(second.resolved.unwrap().source, Source::Cache);
        assert_eq!(second.remote_calls, 0);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_city_query() {
        let mut fake = FakeProvider::answering(&[("Tiszafüred", TISZAFURED)]);
        fake.failing.push("Ismeretlen köz 9., Tiszafüred".into());
        let (geocoder, cache, provider) = setup(fake);

        let lookup = geocoder.lookup("Tiszafüred", "Ismeretlen köz 9.").await;
        let resolved = lookup.resolved.unwrap();

        assert_eq!(resolved.source, Source::RemoteCityOnly);
        assert_eq!(resolved.coordinate, TISZAFURED);
        assert_eq!(lookup.remote_calls, 2);
        assert_eq!(
            provider.calls(),
            vec!["Ismeretlen köz 9., Tiszafüred", "Tiszafüred"]
        );
        assert!(cache.get("Tiszafüred|Ismeretlen köz 9.").is_some());
    }

    #[tokio::test]
    async fn gives_up_without_caching() {
        let (geocoder, cache, provider) = setup(FakeProvider::default());

        assert!(geocoder.resolve("Sehol", "").await.is_none());
        assert_eq!(provider.calls(), vec!["Sehol"]);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn stale_entries_are_refreshed() {
        let (geocoder, cache, provider) =
            setup(FakeProvider::answering(&[("Fő utca 1., Tiszafüred", STREET)]));
        cache
            .set(
                "Tiszafüred|Fő utca 1.",
                CacheEntry::new(TISZAFURED, Utc::now() - chrono::Duration::days(400)),
            )
            .unwrap();

        let geocoder = geocoder.with_policy(CachePolicy::expire_after(chrono::Duration::days(365)));
        let resolved = geocoder.resolve("Tiszafüred", "Fő utca 1.").await.unwrap();

        assert_eq!(resolved.source, Source::Remote);
        assert_eq!(resolved.coordinate, STREET);
        assert_eq!(provider.calls().len(), 1);
    }
}
