//! Database pool setup

use anyhow::{Context, Result};
use curio_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

fn pool_options(config: &Config) -> Result<PgPoolOptions> {
    if config.database_url().is_empty() {
        anyhow::bail!("DATABASE_URL must be set");
    }

    Ok(PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800)))
}

/// Create a connection pool from configuration
pub async fn connect(config: &Config) -> Result<PgPool> {
    let options = pool_options(config)?;

    tracing::info!("Connecting to database...");
    let pool = options
        .connect(config.database_url())
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );

    Ok(pool)
}

/// Create a pool that opens connections on first use
///
/// Lets the installer report an unreachable database as a task failure
/// rather than failing before any task runs.
pub fn connect_lazy(config: &Config) -> Result<PgPool> {
    pool_options(config)?
        .connect_lazy(config.database_url())
        .context("Invalid DATABASE_URL")
}
