//! Time-boxed weather cache behind a pluggable key/value store.
//!
//! The cache holds one JSON blob per logical key. Entries are validated on
//! read: an unparseable blob or one past its `expires_at` is removed and
//! reported as a miss. Writers never lock across a refresh, so the last
//! writer wins.

use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::types::{WeatherData, WeatherError};

/// Key/value persistence port used by [`WeatherCache`].
pub trait CacheStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, entry: String) -> Result<(), WeatherError>;
    fn clear(&self, key: &str);
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, entry: String) -> Result<(), WeatherError> {
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    fn clear(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Failed to read cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn put(&self, key: &str, entry: String) -> Result<(), WeatherError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| WeatherError::Cache(format!("create {}: {}", self.dir.display(), e)))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, entry)
            .map_err(|e| WeatherError::Cache(format!("write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| WeatherError::Cache(format!("rename {}: {}", path.display(), e)))
    }

    fn clear(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::remove_file(&path) {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!("Failed to remove cache file {}: {}", path.display(), e);
            }
        }
    }
}

/// Weather payload cache bound to one logical key.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    store: Arc<dyn CacheStore>,
    key: String,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn CacheStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// In-memory cache, handy for tests and short-lived processes.
    pub fn in_memory(key: impl Into<String>) -> Self {
        Self::new(Arc::new(MemoryStore::new()), key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the cached payload if it is still fresh at `now`.
    pub fn load(&self, now: DateTime<Utc>) -> Option<WeatherData> {
        let raw = self.store.get(&self.key)?;

        let data: WeatherData = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!("Discarding corrupt cache entry '{}': {}", self.key, e);
                self.store.clear(&self.key);
                return None;
            }
        };

        if data.is_expired(now) {
            tracing::debug!("Cache entry '{}' expired at {}", self.key, data.expires_at);
            self.store.clear(&self.key);
            return None;
        }

        tracing::debug!("Cache hit for '{}'", self.key);
        Some(data)
    }

    pub fn store(&self, data: &WeatherData) -> Result<(), WeatherError> {
        let json =
            serde_json::to_string(data).map_err(|e| WeatherError::Cache(e.to_string()))?;
        self.store.put(&self.key, json)
    }

    pub fn clear(&self) {
        self.store.clear(&self.key);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::types::{
        Coordinates, CurrentConditions, DailyForecast, HourlyForecast, WeatherCondition,
    };
    use chrono::{Duration, NaiveDate, TimeZone};

    fn sample_data(fetched_at: DateTime<Utc>) -> WeatherData {
        WeatherData {
            location: Coordinates::new(47.6, -122.3),
            current: CurrentConditions {
                temperature: 61.0,
                feels_like: 59.0,
                humidity: 72.0,
                wind_speed: 6.0,
                uv_index: 2.0,
                precipitation_probability: 15.0,
                condition: WeatherCondition::Cloudy,
                observed_at: fetched_at,
            },
            hourly: vec![HourlyForecast {
                time: fetched_at,
                hour: 8,
                temperature: 61.0,
                feels_like: 59.0,
                humidity: 72.0,
                wind_speed: 6.0,
                uv_index: 2.0,
                precipitation_probability: 15.0,
                condition: WeatherCondition::Cloudy,
            }],
            daily: vec![DailyForecast {
                date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
                high: 66.0,
                low: 48.0,
                precipitation_probability: 30.0,
                uv_index: 4.0,
                humidity: 65.0,
                wind_speed: 8.0,
                condition: WeatherCondition::LightRain,
            }],
            fetched_at,
            expires_at: fetched_at + Duration::minutes(30),
        }
    }

    fn fetched_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 15, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip_within_ttl() {
        let cache = WeatherCache::in_memory("weather_data");
        let data = sample_data(fetched_at());

        cache.store(&data).unwrap();
        let loaded = cache.load(fetched_at() + Duration::minutes(29)).unwrap();

        assert_eq!(loaded, data);
    }

    #[test]
    fn test_expired_entry_is_absent_and_purged() {
        let store = Arc::new(MemoryStore::new());
        let cache = WeatherCache::new(store.clone(), "weather_data");
        cache.store(&sample_data(fetched_at())).unwrap();

        assert!(cache.load(fetched_at() + Duration::minutes(30)).is_none());
        assert!(store.get("weather_data").is_none());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.put("weather_data", "{not json".to_string()).unwrap();
        let cache = WeatherCache::new(store.clone(), "weather_data");

        assert!(cache.load(fetched_at()).is_none());
        assert!(store.get("weather_data").is_none());
    }

    #[test]
    fn test_keys_are_independent() {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
        let a = WeatherCache::new(store.clone(), "a");
        let b = WeatherCache::new(store, "b");

        a.store(&sample_data(fetched_at())).unwrap();
        assert!(a.load(fetched_at()).is_some());
        assert!(b.load(fetched_at()).is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = WeatherCache::new(Arc::new(FileStore::new(dir.path())), "weather_data");
        let data = sample_data(fetched_at());

        cache.store(&data).unwrap();
        assert!(dir.path().join("weather_data.json").exists());
        assert_eq!(cache.load(fetched_at()).unwrap(), data);

        cache.clear();
        assert!(!dir.path().join("weather_data.json").exists());
        assert!(cache.load(fetched_at()).is_none());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.put("../escape/key", "{}".to_string()).unwrap();
        assert!(dir.path().join("___escape_key.json").exists());
    }

    #[test]
    fn test_stored_json_uses_rfc3339_timestamps() {
        let store = Arc::new(MemoryStore::new());
        let cache = WeatherCache::new(store.clone(), "weather_data");
        cache.store(&sample_data(fetched_at())).unwrap();

        let raw = store.get("weather_data").unwrap();
        assert!(raw.contains("\"fetched_at\":\"2026-03-14T15:00:00Z\""));
    }
}
