use crate::cache::{access_count_key, short_url_key, UrlCache};
use crate::config::UrlConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUrlRecord, UrlInfo, UrlRecord, UrlResponse};
use crate::services::short_code::ShortCodeGenerator;
use crate::store::UrlStore;
use crate::util::{normalize_url, seconds_until, short_url};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url as UrlParser;

/// Orchestrates short code allocation, cache-aside lookups and access counting.
///
/// The durable store is authoritative. The cache mirrors redirect targets with
/// a TTL bounded by the record's expiry and keeps its own access counter,
/// which is never reconciled with the persisted one.
pub struct ShortenerService {
    store: Arc<dyn UrlStore>,
    cache: Arc<dyn UrlCache>,
    generator: ShortCodeGenerator,
    config: UrlConfig,
}

impl ShortenerService {
    pub fn new(
        store: Arc<dyn UrlStore>,
        cache: Arc<dyn UrlCache>,
        generator: ShortCodeGenerator,
        config: UrlConfig,
    ) -> Self {
        Self {
            store,
            cache,
            generator,
            config,
        }
    }

    pub fn config(&self) -> &UrlConfig {
        &self.config
    }

    /// Create a short URL, or return the owner's live one for the same URL.
    ///
    /// Reuse does not extend `expires_at`. Two concurrent calls for the same
    /// owner and URL may both miss the reuse lookup and create two records.
    pub async fn create_short_url(
        &self,
        original_url: &str,
        owner_id: i64,
        expires_in_days: Option<i64>,
    ) -> AppResult<UrlResponse> {
        let days = expires_in_days.unwrap_or(self.config.default_expiry_days);
        if days < 1 || days > self.config.max_expiry_days {
            return Err(AppError::Validation(format!(
                "expires_in_days must be between 1 and {}",
                self.config.max_expiry_days
            )));
        }

        let original_url = normalize_url(original_url.trim());
        if self.config.strict_url_validation {
            UrlParser::parse(&original_url)
                .map_err(|e| AppError::InvalidUrl(format!("{}: {}", original_url, e)))?;
        }

        let now = Utc::now();

        if let Some(existing) = self
            .store
            .find_active_by_original_url(&original_url, owner_id, now)
            .await?
        {
            debug!(short_code = %existing.short_code, owner_id, "Reusing live short URL");
            return Ok(self.to_response(existing));
        }

        let expires_at = Duration::try_days(days)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Validation(format!("expires_in_days {} is out of range", days))
            })?;

        let short_code = self.allocate_short_code().await?;

        let record = self
            .store
            .insert(NewUrlRecord {
                original_url,
                short_code,
                owner_id,
                expires_at,
            })
            .await?;

        self.cache_target(&record, Utc::now()).await?;

        info!(short_code = %record.short_code, owner_id, "Created short URL");

        Ok(self.to_response(record))
    }

    /// Resolve a code to its redirect target and count the access.
    pub async fn resolve(&self, short_code: &str) -> AppResult<String> {
        let original_url = match self.cache.get(&short_url_key(short_code)).await? {
            Some(url) => {
                debug!(short_code, "Cache hit");
                url
            }
            None => {
                debug!(short_code, "Cache miss");
                let record = self
                    .store
                    .find_active_by_short_code(short_code, Utc::now())
                    .await?
                    .ok_or(AppError::NotFoundOrExpired)?;

                self.cache_target(&record, Utc::now()).await?;
                record.original_url
            }
        };

        self.record_access(short_code).await?;

        Ok(original_url)
    }

    /// Owner-only view of a code, with the cache counter taking precedence.
    pub async fn get_url_info(&self, short_code: &str, owner_id: i64) -> AppResult<UrlInfo> {
        let mut record = self
            .store
            .find_by_short_code_and_owner(short_code, owner_id)
            .await?
            .ok_or(AppError::PermissionOrNotFound)?;

        // Display only; never written back to the store.
        if let Some(raw) = self.cache.get(&access_count_key(short_code)).await? {
            match raw.parse::<i64>() {
                Ok(count) => record.access_count = count,
                Err(_) => warn!(short_code, value = %raw, "Ignoring non-numeric cache counter"),
            }
        }

        Ok(self.to_info(record))
    }

    /// Page through an owner's URLs with persisted counts.
    pub async fn list_owner_urls(
        &self,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<UrlInfo>> {
        let records = self.store.list_by_owner(owner_id, skip, limit).await?;
        Ok(records.into_iter().map(|r| self.to_info(r)).collect())
    }

    /// Draw candidates until one is free in both the store and the cache.
    async fn allocate_short_code(&self) -> AppResult<String> {
        let attempts = self.config.short_code_max_attempts;

        for attempt in 1..=attempts {
            let candidate = self.generator.generate(self.config.short_code_length);

            if self.store.short_code_exists(&candidate).await? {
                debug!(attempt, candidate = %candidate, "Short code taken in store");
                continue;
            }

            if self.cache.exists(&short_url_key(&candidate)).await? {
                debug!(attempt, candidate = %candidate, "Short code taken in cache");
                continue;
            }

            return Ok(candidate);
        }

        Err(AppError::ConfigurationExhausted { attempts })
    }

    /// Write the redirect target with a TTL equal to the record's remaining lifetime.
    async fn cache_target(&self, record: &UrlRecord, now: DateTime<Utc>) -> AppResult<()> {
        let ttl = seconds_until(record.expires_at, now);
        if ttl == 0 {
            debug!(short_code = %record.short_code, "Record already expired, not caching");
            return Ok(());
        }

        self.cache
            .set(&short_url_key(&record.short_code), &record.original_url, ttl)
            .await
    }

    /// Bump the persisted counter and the cache counter independently.
    async fn record_access(&self, short_code: &str) -> AppResult<()> {
        if !self.store.increment_access_count(short_code).await? {
            warn!(short_code, "Resolved code has no durable record to count against");
        }

        let cached = self.cache.increment(&access_count_key(short_code)).await?;
        debug!(short_code, cached_count = cached, "Recorded access");

        Ok(())
    }

    fn to_response(&self, record: UrlRecord) -> UrlResponse {
        UrlResponse {
            short_url: short_url(&self.config.base_url, &record.short_code),
            original_url: record.original_url,
            expires_at: record.expires_at,
            created_at: record.created_at,
            access_count: record.access_count,
        }
    }

    fn to_info(&self, record: UrlRecord) -> UrlInfo {
        UrlInfo {
            short_url: short_url(&self.config.base_url, &record.short_code),
            original_url: record.original_url,
            short_code: record.short_code,
            expires_at: record.expires_at,
            created_at: record.created_at,
            access_count: record.access_count,
        }
    }
}
