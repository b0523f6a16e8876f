//! PostgreSQL wiring: pool construction, migrations, unit-of-work
//! assembly, and the repository implementations under [`repositories`].

pub mod repositories;

use std::fmt;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::application::unit_of_work::CatalogUnitOfWork;
use crate::error::{CatalogError, Result};

/// Owns the connection pool and produces the repository bundle.
#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    max_connections: u32,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl PostgresDatabase {
    /// Connect to `connection_string` with pool sizing from the
    /// environment (`DB_MAX_CONNECTIONS`, default 10).
    pub async fn new(connection_string: &str) -> Result<Self> {
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .test_before_acquire(true)
            .connect(connection_string)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!(
                    "Database connection failed: {}",
                    e
                ))
            })?;

        info!(
            "Database pool initialized with max_connections={}",
            max_connections
        );

        Ok(Self { pool, max_connections })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded migrations, schema and category seed included.
    pub async fn initialize_schema(&self) -> Result<()> {
        crate::MIGRATOR.run(&self.pool).await.map_err(|e| {
            CatalogError::Internal(format!("Migration failed: {}", e))
        })?;

        info!("Database schema is up to date");
        Ok(())
    }

    /// Liveness probe used by the health endpoint.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                CatalogError::Internal(format!("Database ping failed: {}", e))
            })?;
        Ok(())
    }

    /// Build the repository bundle application services run on.
    pub fn unit_of_work(&self) -> CatalogUnitOfWork {
        CatalogUnitOfWork::from_pool(self.pool.clone())
    }
}
