//! Persisted geocoding results.
//!
//! The store is a plain key/value map keyed by `"{city}|{address}"`. The
//! file-backed variant keeps the whole map in one JSON document under a
//! `geocoding_cache` key and rewrites it on every insert.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Coordinate;

pub const CACHE_BLOB_KEY: &str = "geocoding_cache";

/// Poisoning is ignored: every write is a single `insert`
fn lock_entries(
    entries: &Mutex<HashMap<String, CacheEntry>>,
) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Cache key for a city/address pair
pub fn cache_key(city: &str, address: &str) -> String {
    format!("{city}|{address}")
}

/// Stored coordinate. Entries written before timestamps existed have no
/// `storedAt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(coordinate: Coordinate, stored_at: DateTime<Utc>) -> Self {
        Self {
            lat: coordinate.lat,
            lng: coordinate.lng,
            stored_at: Some(stored_at),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// How long cached coordinates stay usable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` keeps entries forever
    pub ttl: Option<Duration>,
}

impl CachePolicy {
    pub fn never_expire() -> Self {
        Self { ttl: None }
    }

    pub fn expire_after(ttl: Duration) -> Self {
        Self { ttl: Some(ttl) }
    }

    /// Undated entries count as stale once a TTL is set
    pub fn is_fresh(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        match (self.ttl, entry.stored_at) {
            (None, _) => true,
            (Some(ttl), Some(stored_at)) => now - stored_at < ttl,
            (Some(_), None) => false,
        }
    }
}

/// Key/value store for resolved coordinates
pub trait GeocodeCache: Send + Sync {
    fn get(&self, key: &str) -> Option<CacheEntry>;

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError>;
}

/// Process-local cache
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock_entries(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GeocodeCache for MemoryCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        lock_entries(&self.entries).get(key).copied()
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        lock_entries(&self.entries).insert(key.to_string(), entry);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(rename = "geocoding_cache", default)]
    entries: HashMap<String, CacheEntry>,
}

/// Cache persisted as a single JSON document on disk
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl FileCache {
    /// Load the cache at `path`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<CacheFile>(&raw) {
                Ok(file) => file.entries,
                Err(e) => {
                    warn!("Ignoring corrupt geocoding cache {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Loaded {} geocoding cache entries from {}", entries.len(), path.display());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &HashMap<String, CacheEntry>) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = CacheFile {
            entries: entries.clone(),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl GeocodeCache for FileCache {
    fn get(&self, key: &str) -> Option<CacheEntry> {
        lock_entries(&self.entries).get(key).copied()
    }

    fn set(&self, key: &str, entry: CacheEntry) -> Result<(), CacheError> {
        let mut entries = lock_entries(&self.entries);
        entries.insert(key.to_string(), entry);
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn key_joins_city_and_address() {
        assert_eq!(cache_key("Debrecen", "Kassai út 26."), "Debrecen|Kassai út 26.");
        assert_eq!(cache_key("Pécs", ""), "Pécs|");
    }

    #[test]
    fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        assert!(cache.get("a|b").is_none());

        let entry = CacheEntry::new(Coordinate::new(47.0, 19.0), now());
        cache.set("a|b", entry).unwrap();
        assert_eq!(cache.get("a|b"), Some(entry));
        assert_eq!(cache.len(), 1);
    }

    fn poison(entries: &Mutex<HashMap<String, CacheEntry>>) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = entries.lock().unwrap();
            panic!("writer crashed");
        }));
        assert!(result.is_err());
        assert!(entries.is_poisoned());
    }

    #[test]
    fn memory_cache_keeps_working_after_a_panic() {
        let cache = MemoryCache::new();
        let entry = CacheEntry::new(Coordinate::new(47.0, 19.0), now());
        cache.set("a|b", entry).unwrap();
        poison(&cache.entries);

        cache.set("c|d", entry).unwrap();
        assert_eq!(cache.get("c|d"), Some(entry));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn file_cache_persists_after_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        let cache = FileCache::open(&path).unwrap();
        poison(&cache.entries);

        let entry = CacheEntry::new(Coordinate::new(46.0, 18.2), now());
        cache.set("Pécs|", entry).unwrap();

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("Pécs|"), Some(entry));
    }

    #[test]
    fn file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("geocode.json");

        let cache = FileCache::open(&path).unwrap();
        let entry = CacheEntry::new(Coordinate::new(46.25, 20.14), now());
        cache.set("Szeged|Dugonics tér 13.", entry).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[CACHE_BLOB_KEY]["Szeged|Dugonics tér 13."]["lat"], 46.25);

        let reopened = FileCache::open(&path).unwrap();
        assert_eq!(reopened.get("Szeged|Dugonics tér 13."), Some(entry));
    }

    #[test]
    fn reads_legacy_entries_without_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        std::fs::write(&path, r#"{"geocoding_cache": {"Eger|": {"lat": 47.9, "lng": 20.37}}}"#).unwrap();

        let cache = FileCache::open(&path).unwrap();
        let entry = cache.get("Eger|").unwrap();
        assert_eq!(entry.stored_at, None);
        assert_eq!(entry.coordinate(), Coordinate::new(47.9, 20.37));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocode.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = FileCache::open(&path).unwrap();
        assert!(cache.get("anything").is_none());
    }

    #[test]
    fn ttl_policy() {
        let fresh = CacheEntry::new(Coordinate::new(1.0, 1.0), now() - Duration::days(1));
        let old = CacheEntry::new(Coordinate::new(1.0, 1.0), now() - Duration::days(40));
        let undated = CacheEntry {
            stored_at: None,
            ..fresh
        };

        let forever = CachePolicy::never_expire();
        assert!(forever.is_fresh(&old, now()));
        assert!(forever.is_fresh(&undated, now()));

        let month = CachePolicy::expire_after(Duration::days(30));
        assert!(month.is_fresh(&fresh, now()));
        assert!(!month.is_fresh(&old, now()));
        assert!(!month.is_fresh(&undated, now()));
    }
}
