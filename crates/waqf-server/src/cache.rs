//! Query cache
//!
//! Results of expensive read queries keyed by a logical name
//! (`kpi:unified`, ...). Each entry lists the tables it was computed from;
//! a change notification for any of them drops the entry. Entries older
//! than the staleness interval are treated as absent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

struct CacheEntry {
    value: serde_json::Value,
    tables: Vec<String>,
    stored_at: Instant,
}

impl CacheEntry {
    fn is_stale(&self, stale_after: Duration) -> bool {
        self.stored_at.elapsed() >= stale_after
    }
}

/// Thread-safe in-memory query cache
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<DashMap<String, CacheEntry>>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            stale_after,
        }
    }

    /// Cached value for `key`, unless missing, stale or of another shape
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;

        if entry.is_stale(self.stale_after) {
            drop(entry); // Release read lock
            self.entries.remove(key);
            debug!("Cache entry {key} is stale, dropped");
            return None;
        }

        let value = serde_json::from_value(entry.value.clone()).ok();
        if value.is_some() {
            debug!("Cache hit: {key} (age: {:?})", entry.stored_at.elapsed());
        }
        value
    }

    /// Store `value` under `key`, replacing any previous entry
    pub fn put<T: Serialize>(&self, key: &str, tables: &[&str], value: &T) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value,
                        tables: tables.iter().map(|t| t.to_string()).collect(),
                        stored_at: Instant::now(),
                    },
                );
            }
            Err(e) => tracing::warn!("Failed to cache {key}: {e}"),
        }
    }

    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry that depends on `table`; returns how many were dropped
    pub fn invalidate_table(&self, table: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.tables.iter().any(|t| t == table));
        let dropped = before.saturating_sub(self.entries.len());
        if dropped > 0 {
            debug!("Change on {table} invalidated {dropped} cache entries");
        }
        dropped
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_after_put() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put("kpi:unified", &["loans"], &vec![1, 2, 3]);
        assert_eq!(cache.get::<Vec<i32>>("kpi:unified"), Some(vec![1, 2, 3]));
        assert_eq!(cache.get::<Vec<i32>>("other"), None);
    }

    #[test]
    fn test_stale_entries_are_absent() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.put("kpi:unified", &["loans"], &42);
        assert_eq!(cache.get::<i32>("kpi:unified"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_table_change_invalidates_dependents() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put("kpi:unified", &["loans", "funds"], &1);
        cache.put("distribution:settings", &["distribution_settings"], &2);

        assert_eq!(cache.invalidate_table("funds"), 1);
        assert_eq!(cache.get::<i32>("kpi:unified"), None);
        assert_eq!(cache.get::<i32>("distribution:settings"), Some(2));
        assert_eq!(cache.invalidate_table("audit_log"), 0);
    }

    #[test]
    fn test_last_put_wins() {
        let cache = QueryCache::new(Duration::from_secs(60));
        cache.put("k", &[], &"first");
        cache.put("k", &[], &"second");
        assert_eq!(cache.get::<String>("k").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }
}
