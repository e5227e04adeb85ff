use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis pool error: {0}")]
    RedisPool(#[from] deadpool_redis::PoolError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The code never existed or its record has expired. Callers cannot tell which.
    #[error("URL not found or expired")]
    NotFoundOrExpired,

    /// The code does not exist or belongs to another owner.
    #[error("URL not found or you don't have permission to access it")]
    PermissionOrNotFound,

    /// The generator could not find a free code within the attempt bound.
    #[error("Short code space exhausted after {attempts} attempts")]
    ConfigurationExhausted { attempts: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Username already registered: {0}")]
    UserExists(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Environment variable missing: {0}")]
    MissingEnvVar(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::NotFoundOrExpired | AppError::PermissionOrNotFound => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_URL"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::UserExists(_) => (StatusCode::CONFLICT, "USER_EXISTS"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            AppError::Migration(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MIGRATION_ERROR"),
            AppError::Redis(_) | AppError::RedisPool(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CACHE_ERROR")
            }
            AppError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR")
            }
            AppError::ConfigurationExhausted { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CODE_SPACE_EXHAUSTED")
            }
            AppError::Configuration(_) | AppError::MissingEnvVar(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let error_message = match &self {
            AppError::NotFoundOrExpired
            | AppError::PermissionOrNotFound
            | AppError::InvalidUrl(_)
            | AppError::Validation(_)
            | AppError::Unauthorized(_)
            | AppError::UserExists(_) => self.to_string(),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                "Migration error occurred".to_string()
            }
            AppError::Redis(e) => {
                tracing::error!("Redis error: {:?}", e);
                "Cache error occurred".to_string()
            }
            AppError::RedisPool(e) => {
                tracing::error!("Redis pool error: {:?}", e);
                "Cache error occurred".to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "Data serialization error".to_string()
            }
            AppError::ConfigurationExhausted { attempts } => {
                tracing::error!(attempts, "Short code generation exhausted its attempt bound");
                "Could not allocate a short code".to_string()
            }
            _ => {
                tracing::error!("Internal error: {}", self);
                "An internal error occurred".to_string()
            }
        };

        let mut response = (
            status,
            Json(json!({
                "error": error_code,
                "message": error_message,
            })),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                http::header::WWW_AUTHENTICATE,
                http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_errors_share_status() {
        assert_eq!(
            AppError::NotFoundOrExpired.status_and_code(),
            AppError::PermissionOrNotFound.status_and_code()
        );
        assert_eq!(
            AppError::NotFoundOrExpired.status_and_code().0,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_exhaustion_is_server_error() {
        let err = AppError::ConfigurationExhausted { attempts: 1000 };
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("1000"));
    }

    #[test]
    fn test_unauthorized_sets_challenge_header() {
        let response = AppError::Unauthorized("bad token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(http::header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_not_found_message_is_undifferentiated() {
        assert_eq!(AppError::NotFoundOrExpired.to_string(), "URL not found or expired");
    }
}
