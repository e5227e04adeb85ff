use crate::config::CorsConfig;
use crate::middleware::request_id_middleware;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth_handlers;
use super::health;
use super::url_handlers;
use super::AppState;

/// Create application router
pub fn create_router(state: Arc<AppState>, cors_config: &CorsConfig) -> axum::Router {
    // Configure CORS with specific origins
    let cors = if cors_config.allows_any() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<http::HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|s| s.parse::<http::HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let auth_routes = axum::Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/token", post(auth_handlers::login));

    // Static segments win over the `{code}` capture.
    let url_routes = axum::Router::new()
        .route("/shorten", post(url_handlers::shorten_url))
        .route("/info/{code}", get(url_handlers::get_url_info))
        .route("/urls/me", get(url_handlers::list_my_urls))
        .route("/{code}", get(url_handlers::redirect_to_url));

    axum::Router::new()
        .route("/", get(url_handlers::root))
        .route("/health", get(health::health_check))
        .route("/{code}", get(url_handlers::redirect_to_url))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/urls", url_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
