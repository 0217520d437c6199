//! # DVD Rental DB
//!
//! PostgreSQL pool construction and schema migrations.
//!
//! # Example
//!
//! ```ignore
//! use dvdrental_config::DatabaseConfig;
//! use dvdrental_db::{init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()).await?;
//! run_migrations(&pool).await?;
//! ```

use dvdrental_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

pub use sqlx::PgPool;

/// Builds the connection pool and checks connectivity.
///
/// `max_idle_conns` becomes the pool's floor of open connections, and idle
/// connections above it are closed after `max_idle_time`.
///
/// # Errors
///
/// Returns the connection error if the database cannot be reached.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_open_conns)
        .min_connections(config.max_idle_conns.min(config.max_open_conns))
        .idle_timeout(config.max_idle_time)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_open_conns,
        min_connections = config.max_idle_conns,
        "database pool established"
    );

    Ok(pool)
}

/// Applies the SQL files under `migrations/`. They are idempotent against an
/// existing dvdrental schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("database migrations applied");
    Ok(())
}
