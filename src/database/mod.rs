use anyhow::Result;
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::config::DatabaseConfig;

const INITIAL_SCHEMA: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Connection pool wrapper owning database creation and schema setup.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        // Create database if it doesn't exist (for SQLite)
        if !Sqlite::database_exists(&config.url).await.unwrap_or(false) {
            Sqlite::create_database(&config.url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.unwrap_or(10))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> Pool<Sqlite> {
        self.pool.clone()
    }

    pub async fn migrate(&self) -> Result<()> {
        apply_migrations(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }
}

/// Applies the embedded schema statement by statement; every statement is
/// idempotent so reruns are safe.
pub async fn apply_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    for statement in INITIAL_SCHEMA
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
