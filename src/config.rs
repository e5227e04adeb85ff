use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

mod auth;
mod cache;
mod cors;
mod database;
mod server;
mod url;

pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::cors::CorsConfig;
pub use self::database::DatabaseConfig;
pub use self::server::ServerConfig;
pub use self::url::UrlConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub url: UrlConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

/// Read an optional environment variable, falling back to `default` when unset.
fn env_or<T: FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid {}", name))),
        Err(_) => Ok(default),
    }
}

fn env_required(name: &str) -> AppResult<String> {
    env::var(name).map_err(|_| AppError::MissingEnvVar(name.to_string()))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let url_defaults = UrlConfig::default();

        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: env_or("SERVER_HOST", server_defaults.host)?,
            port: env_or("SERVER_PORT", server_defaults.port)?,
        };

        let database = DatabaseConfig {
            url: env_required("DATABASE_URL")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout_seconds: env_or("DB_ACQUIRE_TIMEOUT_SECONDS", 30)?,
        };

        let cache = CacheConfig {
            url: env_or("REDIS_URL", "redis://127.0.0.1:6379/0".to_string())?,
            max_connections: env_or("CACHE_MAX_CONNECTIONS", 10)?,
        };

        let url = UrlConfig {
            base_url: env_or("BASE_URL", server.default_base_url())?,
            short_code_length: env_or("SHORT_CODE_LENGTH", url_defaults.short_code_length)?,
            short_code_max_attempts: env_or(
                "SHORT_CODE_MAX_ATTEMPTS",
                url_defaults.short_code_max_attempts,
            )?,
            default_expiry_days: env_or("DEFAULT_EXPIRY_DAYS", url_defaults.default_expiry_days)?,
            max_expiry_days: env_or("MAX_EXPIRY_DAYS", url_defaults.max_expiry_days)?,
            strict_url_validation: env_or(
                "STRICT_URL_VALIDATION",
                url_defaults.strict_url_validation,
            )?,
        };

        let auth = AuthConfig {
            jwt_secret: env_required("JWT_SECRET")?,
            jwt_expiration_minutes: env_or("JWT_EXPIRATION_MINUTES", 30)?,
        };

        let cors = CorsConfig::parse(&env_or("ALLOWED_ORIGINS", "*".to_string())?);

        let config = Config {
            server,
            database,
            cache,
            url,
            auth,
            cors,
        };

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.database
            .validate()
            .and_then(|_| self.cache.validate())
            .and_then(|_| self.url.validate())
            .and_then(|_| self.auth.validate())
            .map_err(AppError::Configuration)
    }
}
