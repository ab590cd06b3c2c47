//! Database layer for Table Desk
//!
//! Provides:
//! - SeaORM entity and read models
//! - Repository for the document index and extraction reads
//! - Connection pool management

pub mod models;
mod repository;

pub use repository::Repository;

use crate::config::DatabaseConfig;
use crate::db::models::{DocumentEntity, ExtractedTableEntity};
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone, Debug)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration.
    ///
    /// Fails when the URL cannot be built or the store does not answer a ping;
    /// both are startup errors.
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let url = config.connection_url()?;
        Self::connect(&url, config).await
    }

    /// Connect to an explicit URL using the pool settings of `config`
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self> {
        info!("Connecting to database...");

        let mut opts = ConnectOptions::new(url);
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout())
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(config.idle_timeout())
            .sqlx_logging(true);

        let conn = Database::connect(opts)
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Failed to connect: {}", e),
            })?;

        let pool = Self { conn };
        pool.ping().await?;

        info!(
            backend = ?pool.conn.get_database_backend(),
            "Database connection established"
        );

        Ok(pool)
    }

    /// Wrap an existing connection
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get the shared connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Ping the database to check connectivity
    pub async fn ping(&self) -> Result<()> {
        self.conn
            .ping()
            .await
            .map_err(|e| AppError::DatabaseConnection {
                message: format!("Ping failed: {}", e),
            })
    }

    /// Create the `pdfs` and `tables` tables when missing.
    ///
    /// Production schemas are owned by the ingestion process; this exists for
    /// local SQLite databases and tests.
    pub async fn create_schema(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        let schema = Schema::new(backend);

        let mut documents = schema.create_table_from_entity(DocumentEntity);
        let mut tables = schema.create_table_from_entity(ExtractedTableEntity);

        for stmt in [documents.if_not_exists(), tables.if_not_exists()] {
            self.conn.execute(backend.build(&*stmt)).await?;
        }

        Ok(())
    }
}
