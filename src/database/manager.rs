use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A lifecycle transition was refused because the stored state is not a
    /// valid source state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Process-wide connection pool, opened once at startup and shared by every
/// request. All consistency is delegated to Postgres per-row atomicity; no
/// application-level locking.
pub struct Database;

static POOL: OnceLock<PgPool> = OnceLock::new();

impl Database {
    pub fn pool() -> Result<&'static PgPool, StoreError> {
        if let Some(pool) = POOL.get() {
            return Ok(pool);
        }

        let url = std::env::var("DATABASE_URL")
            .map_err(|_| StoreError::ConfigMissing("DATABASE_URL"))?;
        let db_config = &config::config().database;

        // Lazy connect so the process can start (and report degraded health)
        // before the database is reachable
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect_lazy(&url)?;

        let pool = POOL.get_or_init(|| pool);
        info!("Created database pool");
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), StoreError> {
        let pool = Self::pool()?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
