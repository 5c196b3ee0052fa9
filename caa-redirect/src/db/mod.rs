//! Database module - SQLite catalog of releases and their cover art

#[cfg(test)]
pub mod test_utils;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

use crate::config::DEFAULT_MAX_CONNECTIONS;

/// Database handle wrapping SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection with the default pool size
    /// If path is None, uses in-memory database
    #[cfg(test)]
    pub async fn new(path: Option<&str>) -> Result<Self> {
        Self::connect(path, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Create a database connection with an explicit pool size
    pub async fn connect(path: Option<&str>, max_connections: u32) -> Result<Self> {
        let conn_str = match path {
            Some(p) => format!("sqlite:{}?mode=rwc", p),
            None => "sqlite::memory:".to_string(),
        };

        let options = SqliteConnectOptions::from_str(&conn_str)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .foreign_keys(true);

        // Every in-memory connection is its own database, so pin a single one
        let pool_options = match path {
            Some(_) => SqlitePoolOptions::new().max_connections(max_connections.max(1)),
            None => SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None),
        };

        let pool = pool_options.connect_with(options).await?;

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Create the catalog schema if it is not there yet
    async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS release (
                id INTEGER PRIMARY KEY,
                gid TEXT UNIQUE NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS cover_art (
                id INTEGER PRIMARY KEY,
                release INTEGER NOT NULL REFERENCES release(id),
                is_front BOOLEAN NOT NULL DEFAULT 0,
                is_back BOOLEAN NOT NULL DEFAULT 0,
                ordering INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_cover_art_release ON cover_art(release)")
            .execute(&self.pool)
            .await?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check if database is healthy
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
