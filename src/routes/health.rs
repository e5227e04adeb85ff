use crate::error::AppResult;
use crate::routes::types::{HealthCheckResponse, HealthStatus};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use super::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

async fn probe<F>(name: &str, check: F) -> HealthStatus
where
    F: Future<Output = AppResult<()>>,
{
    let start = Instant::now();

    match tokio::time::timeout(PROBE_TIMEOUT, check).await {
        Ok(Ok(())) => HealthStatus {
            status: "connected".to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
        },
        Ok(Err(e)) => {
            warn!(backend = name, error = %e, "Health probe failed");
            HealthStatus {
                status: "disconnected".to_string(),
                latency_ms: None,
            }
        }
        Err(_) => {
            warn!(backend = name, "Health probe timed out");
            HealthStatus {
                status: "disconnected".to_string(),
                latency_ms: None,
            }
        }
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> AppResult<impl IntoResponse> {
    let database = probe("database", state.urls.ping()).await;
    let cache = probe("cache", state.cache.ping()).await;

    let overall_status = if database.status == "connected" && cache.status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    let response = HealthCheckResponse {
        status: overall_status.to_string(),
        database,
        cache,
        timestamp: chrono::Utc::now(),
    };

    Ok(Json(response))
}
