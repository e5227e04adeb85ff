use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::models::{NewUrlRecord, UrlRecord, User};
use crate::store::{UrlStore, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;

/// PostgreSQL error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Database repository
#[derive(Clone)]
pub struct Repository {
    pool: PgPool,
}

impl Repository {
    /// Open a connection pool against the configured database
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(&config.url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UrlStore for Repository {
    async fn find_active_by_original_url(
        &self,
        original_url: &str,
        owner_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE original_url = $1 AND owner_id = $2 AND expires_at > $3
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(original_url)
        .bind(owner_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn find_active_by_short_code(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE short_code = $1 AND expires_at > $2
            "#,
        )
        .bind(short_code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn short_code_exists(&self, short_code: &str) -> AppResult<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)
            "#,
        )
        .bind(short_code)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn find_by_short_code_and_owner(
        &self,
        short_code: &str,
        owner_id: i64,
    ) -> AppResult<Option<UrlRecord>> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE short_code = $1 AND owner_id = $2
            "#,
        )
        .bind(short_code)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn insert(&self, record: NewUrlRecord) -> AppResult<UrlRecord> {
        let result = sqlx::query_as::<_, UrlRecord>(
            r#"
            INSERT INTO urls (original_url, short_code, owner_id, created_at, expires_at, access_count)
            VALUES ($1, $2, $3, $4, $5, 0)
            RETURNING *
            "#,
        )
        .bind(&record.original_url)
        .bind(&record.short_code)
        .bind(record.owner_id)
        .bind(Utc::now())
        .bind(record.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn increment_access_count(&self, short_code: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE urls
            SET access_count = access_count + 1
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(
        &self,
        owner_id: i64,
        skip: i64,
        limit: i64,
    ) -> AppResult<Vec<UrlRecord>> {
        let results = sqlx::query_as::<_, UrlRecord>(
            r#"
            SELECT * FROM urls
            WHERE owner_id = $1
            ORDER BY id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit.max(0))
        .bind(skip.max(0))
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for Repository {
    async fn create_user(&self, username: &str, password_hash: &str) -> AppResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(AppError::UserExists(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn get_user_by_id(&self, user_id: i64) -> AppResult<Option<User>> {
        let result = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }
}
