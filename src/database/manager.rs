use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;
use crate::database::store::StoreError;

/// Centralized connection pool manager. The application runs against one
/// relational store; the pool is created lazily on first use.
pub struct DatabaseManager;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

impl DatabaseManager {
    pub async fn pool() -> Result<&'static PgPool, StoreError> {
        POOL.get_or_try_init(Self::connect).await
    }

    async fn connect() -> Result<PgPool, StoreError> {
        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::Connection("DATABASE_URL is not set".to_string()))?;

        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(&url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!(
            max_connections = db_config.max_connections,
            "database pool initialized"
        );
        Ok(pool)
    }

    /// Cheap liveness probe used by the health endpoint
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
