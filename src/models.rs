use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// URL record in the durable store
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub access_count: i64,
}

impl UrlRecord {
    /// Whether the record can still be used for redirects at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Fields supplied by the caller when inserting a record.
///
/// `id`, `created_at` and `access_count` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: String,
    pub owner_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Registered user
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to create a short URL
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, max = 2048, message = "URL must be 1-2048 characters"))]
    pub original_url: String,

    /// Upper bound comes from `UrlConfig::max_expiry_days` and is checked by the service.
    #[validate(range(min = 1, message = "Expiry must be at least 1 day"))]
    pub expires_in_days: Option<i64>,
}

/// Response after creating (or reusing) a short URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlResponse {
    pub original_url: String,
    pub short_url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

/// Owner-facing view of a short URL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlInfo {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub access_count: i64,
}

/// Request to register a new user
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be 3-64 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}
