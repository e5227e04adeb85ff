//! Administrative command handlers.
//!
//! CLI command handlers for running migrations, checking the cache server
//! and provisioning users without going through the HTTP API.

use crate::auth::AuthService;
use crate::cache::{RedisCache, UrlCache};
use crate::config::Config;
use crate::db::Repository;
use crate::error::AppResult;
use crate::store::UserStore;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Run database migrations
    Migrate,

    /// Ping the cache server
    PingCache,

    /// Create a user account
    CreateUser {
        /// Login name
        #[arg(long)]
        username: String,

        /// Plain-text password; stored as a bcrypt hash
        #[arg(long)]
        password: String,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => migrate(config).await,
        AdminCommands::PingCache => ping_cache(config).await,
        AdminCommands::CreateUser { username, password } => {
            create_user(config, &username, &password).await
        }
    }
}

/// Run database migrations.
async fn migrate(config: Config) -> AppResult<()> {
    info!("Running database migrations...");

    Repository::connect(&config.database)
        .await?
        .run_migrations()
        .await?;

    info!("Migrations completed successfully");
    Ok(())
}

/// Ping the cache server.
async fn ping_cache(config: Config) -> AppResult<()> {
    info!("Pinging cache server...");

    let cache = RedisCache::new(&config.cache.url, config.cache.max_connections)?;
    cache.ping().await?;

    info!("Cache server responded");
    Ok(())
}

/// Create a user account.
async fn create_user(config: Config, username: &str, password: &str) -> AppResult<()> {
    let password_hash = AuthService::from_config(&config.auth).hash_password(password)?;

    let user = Repository::connect(&config.database)
        .await?
        .create_user(username, &password_hash)
        .await?;

    info!("Created user {} with id {}", user.username, user.id);
    Ok(())
}
