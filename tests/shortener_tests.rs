//! Integration tests for the shortening service over in-memory backends.

use chrono::{Duration, Utc};
use rustlink::cache::memory::InMemoryCache;
use rustlink::cache::{access_count_key, short_url_key, UrlCache};
use rustlink::config::UrlConfig;
use rustlink::error::AppError;
use rustlink::models::NewUrlRecord;
use rustlink::services::{ShortCodeGenerator, ShortenerService};
use rustlink::store::memory::InMemoryUrlStore;
use rustlink::store::UrlStore;
use std::collections::HashSet;
use std::sync::Arc;

const OWNER: i64 = 1;
const OTHER_OWNER: i64 = 2;

struct Fixture {
    store: Arc<InMemoryUrlStore>,
    cache: Arc<InMemoryCache>,
    service: Arc<ShortenerService>,
}

fn fixture_with(config: UrlConfig, generator: ShortCodeGenerator) -> Fixture {
    let store = Arc::new(InMemoryUrlStore::new());
    let cache = Arc::new(InMemoryCache::new());
    let service = Arc::new(ShortenerService::new(
        store.clone(),
        cache.clone(),
        generator,
        config,
    ));

    Fixture {
        store,
        cache,
        service,
    }
}

fn fixture() -> Fixture {
    fixture_with(UrlConfig::default(), ShortCodeGenerator::from_seed(2024))
}

fn code_of(short_url: &str) -> String {
    short_url.rsplit('/').next().unwrap().to_string()
}

async fn durable_count(fixture: &Fixture, code: &str) -> i64 {
    fixture
        .store
        .find_by_short_code_and_owner(code, OWNER)
        .await
        .unwrap()
        .unwrap()
        .access_count
}

mod create {
    use super::*;

    #[tokio::test]
    async fn scheme_is_prepended_and_code_is_seven_alphanumerics() {
        let f = fixture();

        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();

        assert_eq!(response.original_url, "https://example.com");
        assert_eq!(response.access_count, 0);
        assert!(response.short_url.starts_with("http://localhost:8000/"));

        let code = code_of(&response.short_url);
        assert_eq!(code.len(), 7);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

        let stored = f
            .store
            .find_by_short_code_and_owner(&code, OWNER)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.original_url, "https://example.com");
        assert_eq!(stored.access_count, 0);
    }

    #[tokio::test]
    async fn create_then_resolve_returns_original() {
        let f = fixture();

        let response = f
            .service
            .create_short_url("https://www.rust-lang.org/learn", OWNER, None)
            .await
            .unwrap();

        let resolved = f
            .service
            .resolve(&code_of(&response.short_url))
            .await
            .unwrap();
        assert_eq!(resolved, "https://www.rust-lang.org/learn");
    }

    #[tokio::test]
    async fn omitted_expiry_uses_default_days() {
        let f = fixture();
        let before = Utc::now();

        let response = f
            .service
            .create_short_url("example.com", OWNER, None)
            .await
            .unwrap();

        let lifetime = response.expires_at - before;
        assert!(lifetime >= Duration::days(7));
        assert!(lifetime < Duration::days(7) + Duration::seconds(5));
    }

    #[tokio::test]
    async fn repeat_create_reuses_record_without_extending_expiry() {
        let f = fixture();

        let first = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let second = f
            .service
            .create_short_url("https://example.com", OWNER, Some(30))
            .await
            .unwrap();

        assert_eq!(first.short_url, second.short_url);
        assert_eq!(first.expires_at, second.expires_at);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn reuse_is_per_owner() {
        let f = fixture();

        let mine = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let theirs = f
            .service
            .create_short_url("example.com", OTHER_OWNER, Some(7))
            .await
            .unwrap();

        assert_ne!(mine.short_url, theirs.short_url);
        assert_eq!(f.store.len(), 2);
    }

    #[tokio::test]
    async fn expired_record_is_not_reused() {
        let f = fixture();
        f.store
            .insert(NewUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: "OldCode".to_string(),
                owner_id: OWNER,
                expires_at: Utc::now() - Duration::days(1),
            })
            .await
            .unwrap();

        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();

        assert_ne!(code_of(&response.short_url), "OldCode");
        assert_eq!(f.store.len(), 2);
    }

    #[tokio::test]
    async fn cache_ttl_equals_remaining_lifetime() {
        let f = fixture();

        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let code = code_of(&response.short_url);

        let ttl = f.cache.ttl_at_write(&short_url_key(&code)).unwrap();
        let remaining = (response.expires_at - Utc::now()).num_seconds() as u64;

        assert!(ttl <= 7 * 86_400);
        assert!(ttl >= remaining);
        assert!(ttl - remaining <= 5);
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_codes() {
        let f = fixture();
        let mut handles = Vec::new();

        for i in 0..50 {
            let service = Arc::clone(&f.service);
            handles.push(tokio::spawn(async move {
                service
                    .create_short_url(&format!("example{}.com", i), OWNER, Some(1))
                    .await
                    .unwrap()
                    .short_url
            }));
        }

        let mut codes = HashSet::new();
        for handle in handles {
            codes.insert(handle.await.unwrap());
        }

        assert_eq!(codes.len(), 50);
        assert_eq!(f.store.len(), 50);
    }

    #[tokio::test]
    async fn malformed_url_rejected_under_strict_validation() {
        let f = fixture();

        let err = f
            .service
            .create_short_url("http://", OWNER, Some(7))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidUrl(_)));
        assert!(f.store.is_empty());
    }
}

mod code_space {
    use super::*;

    fn single_code_fixture(max_attempts: u32) -> Fixture {
        let config = UrlConfig {
            short_code_length: 4,
            short_code_max_attempts: max_attempts,
            ..UrlConfig::default()
        };
        fixture_with(config, ShortCodeGenerator::from_seed(1).with_alphabet(b"a"))
    }

    #[tokio::test]
    async fn exhausted_space_fails_instead_of_spinning() {
        let f = single_code_fixture(3);

        let first = f
            .service
            .create_short_url("one.example", OWNER, Some(1))
            .await
            .unwrap();
        assert_eq!(code_of(&first.short_url), "aaaa");

        let err = f
            .service
            .create_short_url("two.example", OWNER, Some(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationExhausted { attempts: 3 }));
        assert_eq!(f.store.len(), 1);
    }

    #[tokio::test]
    async fn code_held_only_by_cache_is_rejected() {
        let f = single_code_fixture(3);
        f.cache
            .set(&short_url_key("aaaa"), "https://elsewhere.example", 60)
            .await
            .unwrap();

        let err = f
            .service
            .create_short_url("one.example", OWNER, Some(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationExhausted { .. }));
        assert!(f.store.is_empty());
    }

    #[tokio::test]
    async fn expired_codes_are_never_reused() {
        let f = single_code_fixture(3);
        f.store
            .insert(NewUrlRecord {
                original_url: "https://old.example".to_string(),
                short_code: "aaaa".to_string(),
                owner_id: OTHER_OWNER,
                expires_at: Utc::now() - Duration::days(30),
            })
            .await
            .unwrap();

        let err = f
            .service
            .create_short_url("new.example", OWNER, Some(1))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::ConfigurationExhausted { .. }));
    }
}

mod resolve {
    use super::*;

    #[tokio::test]
    async fn unknown_and_expired_codes_look_the_same() {
        let f = fixture();
        f.store
            .insert(NewUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: "Expired".to_string(),
                owner_id: OWNER,
                expires_at: Utc::now() - Duration::seconds(1),
            })
            .await
            .unwrap();

        let expired = f.service.resolve("Expired").await.unwrap_err();
        let unknown = f.service.resolve("Missing").await.unwrap_err();

        assert!(matches!(expired, AppError::NotFoundOrExpired));
        assert!(matches!(unknown, AppError::NotFoundOrExpired));
        assert_eq!(expired.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn expired_code_after_eviction_is_not_found() {
        let f = fixture();
        f.store
            .insert(NewUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: "Evicted".to_string(),
                owner_id: OWNER,
                expires_at: Utc::now() - Duration::minutes(5),
            })
            .await
            .unwrap();
        f.cache.evict(&short_url_key("Evicted"));

        let err = f.service.resolve("Evicted").await.unwrap_err();
        assert!(matches!(err, AppError::NotFoundOrExpired));
        assert_eq!(durable_count(&f, "Evicted").await, 0);
    }

    #[tokio::test]
    async fn cache_hit_is_served_without_expiry_check() {
        let f = fixture();
        f.store
            .insert(NewUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: "Stale01".to_string(),
                owner_id: OWNER,
                expires_at: Utc::now() - Duration::minutes(5),
            })
            .await
            .unwrap();
        f.cache
            .set(&short_url_key("Stale01"), "https://example.com", 60)
            .await
            .unwrap();

        assert_eq!(
            f.service.resolve("Stale01").await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn miss_repopulates_cache() {
        let f = fixture();
        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(2))
            .await
            .unwrap();
        let code = code_of(&response.short_url);
        let key = short_url_key(&code);

        assert!(f.cache.evict(&key));
        assert_eq!(f.service.resolve(&code).await.unwrap(), "https://example.com");

        assert_eq!(
            f.cache.get(&key).await.unwrap().as_deref(),
            Some("https://example.com")
        );
        let ttl = f.cache.ttl_at_write(&key).unwrap();
        assert!(ttl <= 2 * 86_400);
        assert!(ttl > 2 * 86_400 - 5);
    }

    #[tokio::test]
    async fn both_counters_advance_independently() {
        let f = fixture();
        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let code = code_of(&response.short_url);
        let counter = access_count_key(&code);

        assert_eq!(durable_count(&f, &code).await, 0);
        assert!(f.cache.get(&counter).await.unwrap().is_none());

        f.service.resolve(&code).await.unwrap();
        assert_eq!(durable_count(&f, &code).await, 1);
        assert_eq!(f.cache.get(&counter).await.unwrap().as_deref(), Some("1"));

        f.service.resolve(&code).await.unwrap();
        assert_eq!(durable_count(&f, &code).await, 2);
        assert_eq!(f.cache.get(&counter).await.unwrap().as_deref(), Some("2"));
    }
}

mod info {
    use super::*;

    #[tokio::test]
    async fn durable_count_shown_without_cache_counter() {
        let f = fixture();
        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let code = code_of(&response.short_url);

        f.store.increment_access_count(&code).await.unwrap();
        f.store.increment_access_count(&code).await.unwrap();

        let info = f.service.get_url_info(&code, OWNER).await.unwrap();
        assert_eq!(info.access_count, 2);
        assert_eq!(info.short_code, code);
        assert_eq!(info.original_url, "https://example.com");
        assert_eq!(info.short_url, response.short_url);
    }

    #[tokio::test]
    async fn cache_counter_overrides_view_only() {
        let f = fixture();
        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let code = code_of(&response.short_url);

        f.service.resolve(&code).await.unwrap();
        f.service.resolve(&code).await.unwrap();
        f.cache.increment(&access_count_key(&code)).await.unwrap();

        let info = f.service.get_url_info(&code, OWNER).await.unwrap();
        assert_eq!(info.access_count, 3);

        // Not written back
        assert_eq!(durable_count(&f, &code).await, 2);
        let listed = f.service.list_owner_urls(OWNER, 0, 100).await.unwrap();
        assert_eq!(listed[0].access_count, 2);
    }

    #[tokio::test]
    async fn other_owner_and_unknown_code_look_the_same() {
        let f = fixture();
        let response = f
            .service
            .create_short_url("example.com", OWNER, Some(7))
            .await
            .unwrap();
        let code = code_of(&response.short_url);

        let foreign = f.service.get_url_info(&code, OTHER_OWNER).await.unwrap_err();
        let unknown = f.service.get_url_info("Missing", OWNER).await.unwrap_err();

        assert!(matches!(foreign, AppError::PermissionOrNotFound));
        assert!(matches!(unknown, AppError::PermissionOrNotFound));
    }

    #[tokio::test]
    async fn expired_records_remain_visible_to_owner() {
        let f = fixture();
        f.store
            .insert(NewUrlRecord {
                original_url: "https://example.com".to_string(),
                short_code: "Expired".to_string(),
                owner_id: OWNER,
                expires_at: Utc::now() - Duration::days(1),
            })
            .await
            .unwrap();

        let info = f.service.get_url_info("Expired", OWNER).await.unwrap();
        assert_eq!(info.short_code, "Expired");
    }

    #[tokio::test]
    async fn listing_is_paginated_and_owner_scoped() {
        let f = fixture();
        let mut created = Vec::new();
        for host in ["a.example", "b.example", "c.example"] {
            created.push(
                f.service
                    .create_short_url(host, OWNER, Some(7))
                    .await
                    .unwrap(),
            );
        }
        f.service
            .create_short_url("d.example", OTHER_OWNER, Some(7))
            .await
            .unwrap();

        let all = f.service.list_owner_urls(OWNER, 0, 100).await.unwrap();
        assert_eq!(all.len(), 3);

        let page = f.service.list_owner_urls(OWNER, 1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].short_url, created[1].short_url);
        assert_eq!(page[0].original_url, "https://b.example");
    }
}
