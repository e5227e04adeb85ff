use super::UrlCache;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl_seconds: Option<u64>,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Process-local cache with Redis-like TTL and counter semantics.
///
/// Expired entries are dropped lazily on access.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: DashMap<String, Entry>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// TTL passed to the most recent write of `key`, if it is still live.
    pub fn ttl_at_write(&self, key: &str) -> Option<u64> {
        self.live(key).and_then(|e| e.ttl_seconds)
    }

    /// Drop `key` as if it had been evicted.
    pub fn evict(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    fn live(&self, key: &str) -> Option<Entry> {
        // Only an entry still expired under the shard lock is removed.
        if self.entries.remove_if(key, |_, e| e.is_expired()).is_some() {
            return None;
        }
        self.entries
            .get(key)
            .map(|e| e.value().clone())
            .filter(|e| !e.is_expired())
    }
}

#[async_trait]
impl UrlCache for InMemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.live(key).map(|e| e.value))
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()> {
        if ttl_seconds == 0 {
            return Err(AppError::Internal(format!(
                "invalid expire time for key {}",
                key
            )));
        }

        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                ttl_seconds: Some(ttl_seconds),
                deadline: Some(Instant::now() + Duration::from_secs(ttl_seconds)),
            },
        );
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(self.live(key).is_some())
    }

    async fn increment(&self, key: &str) -> AppResult<i64> {
        // Purge an expired value so the counter restarts from 0.
        let _ = self.live(key);

        let mut entry = self.entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: "0".to_string(),
            ttl_seconds: None,
            deadline: None,
        });

        let current: i64 = entry.value.parse().map_err(|_| {
            AppError::Internal(format!("value at {} is not an integer", key))
        })?;
        let next = current + 1;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
