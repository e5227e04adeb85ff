use super::{UrlStore, UserStore};
use crate::error::{AppError, AppResult};
use crate::models::{NewUrlRecord, UrlRecord, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory URL store keyed by short code.
///
/// Records are never removed, so codes stay reserved after expiry just as
/// they do in the PostgreSQL table.
#[derive(Debug, Default)]
pub struct InMemoryUrlStore {
    records: DashMap<String, UrlRecord>,
    next_id: AtomicI64,
}

impl InMemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl UrlStore for InMemoryUrlStore {
    async fn find_active_by_original_url(
        &self,
        original_url: &str,
        owner_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.original_url == original_url && r.owner_id == owner_id && r.is_active(now))
            .min_by_key(|r| r.id)
            .map(|r| r.value().clone()))
    }

    async fn find_active_by_short_code(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>> {
        Ok(self
            .records
            .get(short_code)
            .filter(|r| r.is_active(now))
            .map(|r| r.value().clone()))
    }

    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool> {
        Ok(self.records.contains_key(short_code))
    }

    async fn find_by_short_code_and_owner(
        &self,
        short_code: &str,
        owner_id: i64,
    ) -> AppResult<Option<UrlRecord>> {
        Ok(self
            .records
            .get(short_code)
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone()))
    }

    async fn insert(&self, record: NewUrlRecord) -> AppResult<UrlRecord> {
        match self.records.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::Internal(format!(
                "duplicate short code: {}",
                record.short_code
            ))),
            Entry::Vacant(slot) => {
                let stored = UrlRecord {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    original_url: record.original_url,
                    short_code: record.short_code,
                    owner_id: record.owner_id,
                    created_at: Utc::now(),
                    expires_at: record.expires_at,
                    access_count: 0,
                };
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn increment_access_count(&self, short_code: &str) -> AppResult<bool> {
        match self.records.get_mut(short_code) {
            Some(mut record) => {
                record.access_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<UrlRecord>> {
        let mut owned: Vec<UrlRecord> = self
            .records
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .map(|r| r.value().clone())
            .collect();
        owned.sort_by_key(|r| r.id);

        Ok(owned
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// In-memory user store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
    next_id: AtomicI64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<User> {
        match self.users.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::UserExists(username.to_string())),
            Entry::Vacant(slot) => {
                let user = User {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    username: username.to_string(),
                    password_hash: password_hash.to_string(),
                    is_active: true,
                    created_at: Utc::now(),
                };
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn get_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.id == user_id)
            .map(|u| u.value().clone()))
    }
}
