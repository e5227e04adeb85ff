use chrono::Duration;
use serde::Deserialize;

/// Minimum HS256 signing key length accepted at startup
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Bearer token settings for the owner-scoped endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> Duration {
        Duration::minutes(self.jwt_expiration_minutes)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LEN
            ));
        }

        if self.jwt_expiration_minutes < 1 {
            return Err("JWT_EXPIRATION_MINUTES must be at least 1".to_string());
        }

        Ok(())
    }
}
