use serde::Deserialize;

const REDIS_SCHEMES: [&str; 3] = ["redis://", "rediss://", "redis+unix://"];

/// Cache (Redis) connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub url: String,
    pub max_connections: u32,
}

impl CacheConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !REDIS_SCHEMES.iter().any(|s| self.url.starts_with(s)) {
            return Err(format!(
                "REDIS_URL must start with one of {}",
                REDIS_SCHEMES.join(", ")
            ));
        }

        if self.max_connections == 0 {
            return Err("CACHE_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        Ok(())
    }
}
