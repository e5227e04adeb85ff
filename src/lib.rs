//! rustLink - a URL shortener with cache-aside lookups.
//!
//! Short URLs are persisted in a durable store (PostgreSQL) and mirrored into
//! a TTL-bounded cache (Redis). [`services::ShortenerService`] owns the
//! allocation, lookup and access-counting protocol between the two.

pub mod admin;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod services;
pub mod state;
pub mod store;
pub mod util;
