//! Database connection management

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::StorageConfig;

/// Create a new database connection pool
pub async fn create_pool(config: &StorageConfig) -> anyhow::Result<PgPool> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Test database connection
pub async fn test_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
