use serde::Deserialize;
use std::time::Duration;

/// Durable URL store (PostgreSQL) connection pool settings
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_seconds)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(self.url.starts_with("postgres://") || self.url.starts_with("postgresql://")) {
            return Err("DATABASE_URL must be a postgres:// or postgresql:// URL".to_string());
        }

        match (self.min_connections, self.max_connections) {
            (_, 0) => Err("DB_MAX_CONNECTIONS must be greater than 0".to_string()),
            (min, max) if min > max => {
                Err("DB_MIN_CONNECTIONS cannot exceed DB_MAX_CONNECTIONS".to_string())
            }
            _ if self.acquire_timeout_seconds == 0 => {
                Err("DB_ACQUIRE_TIMEOUT_SECONDS must be greater than 0".to_string())
            }
            _ => Ok(()),
        }
    }
}
