//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::PgPool;

use crate::domain::storage::{Storage, StorageEntity};

use super::in_memory::InMemoryStorage;
use super::postgres::PostgresStorage;

/// Supported storage types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL JSONB document storage
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub fn create_in_memory<E>() -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        Arc::new(InMemoryStorage::<E>::new())
    }

    /// Wraps an already connected pool; the table is expected to exist
    pub fn create_postgres_with_pool<E>(pool: PgPool, table_name: &str) -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        Arc::new(PostgresStorage::<E>::new(pool, table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{User, UserEmail};

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!(StorageType::from_str("memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("In-Memory"), Some(StorageType::InMemory));
        assert_eq!(StorageType::from_str("postgres"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("postgresql"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("pg"), Some(StorageType::Postgres));
        assert_eq!(StorageType::from_str("mongodb"), None);
    }

    #[tokio::test]
    async fn test_create_in_memory_backend() {
        let storage = StorageFactory::create_in_memory::<User>();

        storage
            .create(User::new("Ann", UserEmail::new("a@example.com"), "hash"))
            .await
            .unwrap();
        assert_eq!(storage.count().await.unwrap(), 1);
    }
}
