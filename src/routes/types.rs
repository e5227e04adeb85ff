use serde::{Deserialize, Serialize};

/// Default and maximum page size for owner listings
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for listing URLs
#[derive(Debug, Default, Deserialize)]
pub struct ListUrlsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListUrlsQuery {
    /// Resolve to a non-negative offset and a limit in 0..=MAX_PAGE_SIZE
    pub fn page(&self) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(MAX_PAGE_SIZE).clamp(0, MAX_PAGE_SIZE);
        (skip, limit)
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub database: HealthStatus,
    pub cache: HealthStatus,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Individual health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub latency_ms: Option<u64>,
}
