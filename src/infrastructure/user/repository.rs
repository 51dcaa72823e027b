//! Storage-backed user repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::storage::Storage;
use crate::domain::user::{User, UserEmail, UserRepository, UserSummary, USER_ALREADY_EXISTS};
use crate::domain::DomainError;

/// Storage-backed implementation of UserRepository
#[derive(Debug)]
pub struct StorageUserRepository {
    storage: Arc<dyn Storage<User>>,
}

impl StorageUserRepository {
    /// Create a new storage-backed repository
    pub fn new(storage: Arc<dyn Storage<User>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserRepository for StorageUserRepository {
    async fn insert(&self, user: User) -> Result<User, DomainError> {
        // The store's key constraint is authoritative; a conflict here means a
        // concurrent request won the race after the caller's lookup.
        self.storage.create(user).await.map_err(|e| match e {
            DomainError::Conflict { .. } => DomainError::conflict(USER_ALREADY_EXISTS),
            other => other,
        })
    }

    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, DomainError> {
        self.storage.get(email).await
    }

    async fn update_existing(&self, user: &User) -> Result<User, DomainError> {
        self.storage.update(user.clone()).await
    }

    async fn delete_by_email(&self, email: &UserEmail) -> Result<Option<User>, DomainError> {
        self.storage.remove(email).await
    }

    async fn list_summaries(&self) -> Result<Vec<UserSummary>, DomainError> {
        let users = self.storage.list().await?;
        Ok(users.iter().map(User::summary).collect())
    }

    async fn email_exists(&self, email: &UserEmail) -> Result<bool, DomainError> {
        self.storage.exists(email).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }
}
