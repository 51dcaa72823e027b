//! Storage trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::{StorageEntity, StorageKey};

/// Document store for one collection of entities
///
/// `create` must fail with `DomainError::Conflict` when a document with the
/// same key already exists. Backends enforce this themselves, so callers may
/// rely on it even when two writers race.
#[async_trait]
pub trait Storage<E>: Send + Sync + Debug
where
    E: StorageEntity + 'static,
{
    /// Retrieves an entity by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all entities
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Inserts a new entity, returns a conflict if the key is taken
    async fn create(&self, entity: E) -> Result<E, DomainError>;

    /// Replaces an existing entity, returns not found if the key is absent
    async fn update(&self, entity: E) -> Result<E, DomainError>;

    /// Deletes an entity and hands back what was stored
    async fn remove(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
