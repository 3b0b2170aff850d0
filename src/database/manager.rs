use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StorageBackend};

use super::memory::MemoryStore;
use super::postgres::PgStore;
use super::store::Store;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Duplicate value for unique key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the storage handle the rest of the application is wired with
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open the configured backend and run migrations when enabled
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        let store: Arc<dyn Store> = match config.backend {
            StorageBackend::Postgres => Arc::new(PgStore::new(Self::connect(config).await?)),
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
        };

        if config.run_migrations {
            store.migrate().await?;
        }

        Ok(store)
    }

    /// Create a PostgreSQL pool from DATABASE_URL and the pool settings
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!(
            "Created database pool (max_connections={})",
            config.max_connections
        );
        Ok(pool)
    }
}
