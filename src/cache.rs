//! Cache layer: a key/value store with per-key expiry.
//!
//! The cache is never authoritative. It holds `short_url:{code}` entries whose
//! TTL tracks the backing record's remaining lifetime, and free-running
//! `access_count:{code}` counters.

pub mod memory;

use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Manager, Pool, Runtime};

const SHORT_URL_PREFIX: &str = "short_url";
const ACCESS_COUNT_PREFIX: &str = "access_count";

/// Cache key holding the redirect target for a code
pub fn short_url_key(short_code: &str) -> String {
    format!("{}:{}", SHORT_URL_PREFIX, short_code)
}

/// Cache key holding the cache-side access counter for a code
pub fn access_count_key(short_code: &str) -> String {
    format!("{}:{}", ACCESS_COUNT_PREFIX, short_code)
}

/// Key/value cache with per-key expiry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlCache: Send + Sync {
    /// Get the value stored under `key`, if present and not expired.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, expiring after `ttl_seconds` (must be > 0).
    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()>;

    /// Whether `key` currently holds a value.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Add one to the integer under `key`, starting from 0 when absent.
    async fn increment(&self, key: &str) -> AppResult<i64>;

    /// Check connectivity.
    async fn ping(&self) -> AppResult<()>;
}

/// Redis-backed cache
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Create a new cache connection pool
    pub fn new(redis_url: &str, max_connections: u32) -> AppResult<Self> {
        let manager = Manager::new(redis_url)
            .map_err(|e| AppError::Configuration(format!("Invalid Redis URL: {}", e)))?;

        let pool = Pool::builder(manager)
            .max_size(max_connections as usize)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl UrlCache for RedisCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_seconds).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let mut conn = self.pool.get().await?;
        let result: bool = conn.exists(key).await?;
        Ok(result)
    }

    async fn increment(&self, key: &str) -> AppResult<i64> {
        let mut conn = self.pool.get().await?;
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.pool.get().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
