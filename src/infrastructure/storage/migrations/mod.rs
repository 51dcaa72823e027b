//! Database migrations for the user document table

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

use super::postgres::document_table_ddl;

/// Trait for running database migrations
#[async_trait]
pub trait Migrator: Send + Sync {
    /// Runs all pending migrations
    async fn run(&self, migrations: &[Migration]) -> Result<(), DomainError>;

    /// Returns the current migration version
    async fn version(&self) -> Result<Option<i64>, DomainError>;
}

/// PostgreSQL migrator recording applied versions in `_migrations`
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration unless it was already applied
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to open transaction: {}", e)))?;

        for statement in migration.statements() {
            sqlx::query(statement).execute(&mut *tx).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;
        }

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit migration: {}", e)))?;

        info!(version = migration.version, description = %migration.description, "Applied migration");
        Ok(true)
    }
}

#[async_trait]
impl Migrator for PostgresMigrator {
    async fn run(&self, migrations: &[Migration]) -> Result<(), DomainError> {
        for migration in migrations {
            self.run_migration(migration).await?;
        }
        Ok(())
    }

    async fn version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get migration version: {}", e)))
    }
}

/// A versioned schema change
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub description: String,
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }

    /// Individual SQL statements, since prepared queries take one at a time
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.up
            .split(';')
            .map(str::trim)
            .filter(|statement| !statement.is_empty())
    }
}

/// Migrations for the user document table
pub fn user_migrations(table: &str) -> Vec<Migration> {
    vec![
        Migration::new(1, format!("Create {} table", table), document_table_ddl(table)),
        Migration::new(
            2,
            format!("Index {} documents", table),
            format!(
                r#"
                CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_email ON {table} ((data->>'email'));
                CREATE INDEX IF NOT EXISTS idx_{table}_created_at ON {table} (created_at);
                "#,
                table = table
            ),
        ),
        Migration::new(
            3,
            format!("Unbounded {} keys", table),
            format!("ALTER TABLE {table} ALTER COLUMN key TYPE TEXT", table = table),
        ),
    ]
}

/// Applies every user table migration
pub async fn run_storage_migrations(pool: &PgPool, table: &str) -> Result<(), DomainError> {
    PostgresMigrator::new(pool.clone())
        .run(&user_migrations(table))
        .await
}
