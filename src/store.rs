//! Durable store interfaces.
//!
//! The durable store is the authoritative record keeper for URL mappings and
//! users. [`crate::db::Repository`] implements these traits on PostgreSQL and
//! [`memory`] provides process-local implementations.

pub mod memory;

use crate::error::AppResult;
use crate::models::{NewUrlRecord, UrlRecord, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence for URL records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Find a record for this owner and URL whose `expires_at` is after `now`.
    async fn find_active_by_original_url(
        &self,
        original_url: &str,
        owner_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>>;

    /// Find the record holding `short_code` if it has not expired at `now`.
    async fn find_active_by_short_code(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>>;

    /// Whether any record, expired or not, holds `short_code`.
    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool>;

    /// Find the record holding `short_code` owned by `owner_id`, regardless of expiry.
    async fn find_by_short_code_and_owner(
        &self,
        short_code: &str,
        owner_id: i64,
    ) -> AppResult<Option<UrlRecord>>;

    /// Insert a single record with `access_count = 0`.
    async fn insert(&self, record: NewUrlRecord) -> AppResult<UrlRecord>;

    /// Add one to the persisted access count. Returns `false` when no record holds the code.
    async fn increment_access_count(&self, short_code: &str) -> AppResult<bool>;

    /// Page through an owner's records in insertion order.
    async fn list_by_owner(&self, owner_id: i64, skip: i64, limit: i64)
        -> AppResult<Vec<UrlRecord>>;

    /// Check connectivity.
    async fn ping(&self) -> AppResult<()>;
}

/// Persistence for registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a new user. Fails with `UserExists` when the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<User>;

    /// Get a user by username
    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Get a user by ID
    async fn get_user_by_id(&self, user_id: i64) -> AppResult<Option<User>>;
}
