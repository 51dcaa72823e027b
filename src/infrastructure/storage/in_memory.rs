//! In-memory storage implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{Storage, StorageEntity, StorageKey};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Useful for testing and development. Data is lost when the process
/// terminates. Listing returns documents in insertion order, like the
/// PostgreSQL backend does.
#[derive(Debug)]
pub struct InMemoryStorage<E>
where
    E: StorageEntity,
{
    inner: RwLock<Documents<E>>,
}

#[derive(Debug)]
struct Documents<E> {
    next_seq: u64,
    by_key: HashMap<String, (u64, E)>,
}

impl<E> Default for InMemoryStorage<E>
where
    E: StorageEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryStorage<E>
where
    E: StorageEntity,
{
    /// Creates a new empty in-memory storage
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Documents {
                next_seq: 0,
                by_key: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Documents<E>>, DomainError> {
        self.inner
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Documents<E>>, DomainError> {
        self.inner
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl<E> Storage<E> for InMemoryStorage<E>
where
    E: StorageEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let docs = self.read()?;
        Ok(docs.by_key.get(key.as_str()).map(|(_, e)| e.clone()))
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let docs = self.read()?;
        let mut entries: Vec<&(u64, E)> = docs.by_key.values().collect();
        entries.sort_by_key(|(seq, _)| *seq);

        Ok(entries.into_iter().map(|(_, e)| e.clone()).collect())
    }

    async fn create(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut docs = self.write()?;

        if docs.by_key.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Entity with key '{}' already exists",
                key
            )));
        }

        let seq = docs.next_seq;
        docs.next_seq += 1;
        docs.by_key.insert(key, (seq, entity.clone()));
        Ok(entity)
    }

    async fn update(&self, entity: E) -> Result<E, DomainError> {
        let key = entity.key().as_str().to_string();
        let mut docs = self.write()?;

        match docs.by_key.get_mut(&key) {
            Some((_, stored)) => {
                *stored = entity.clone();
                Ok(entity)
            }
            None => Err(DomainError::not_found(format!(
                "Entity with key '{}' not found",
                key
            ))),
        }
    }

    async fn remove(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let mut docs = self.write()?;
        Ok(docs.by_key.remove(key.as_str()).map(|(_, e)| e))
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.read()?.by_key.len())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.read()?.by_key.contains_key(key.as_str()))
    }
}
