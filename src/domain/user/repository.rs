//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserEmail, UserSummary};
use crate::domain::DomainError;

/// Record store for user documents, addressed by email
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a new user
    ///
    /// Fails with `DomainError::Conflict` when the email is already stored,
    /// regardless of any check the caller made beforehand.
    async fn insert(&self, user: User) -> Result<User, DomainError>;

    /// Look a user up by email
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, DomainError>;

    /// Replace a stored user
    async fn update_existing(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user, returning the removed record
    async fn delete_by_email(&self, email: &UserEmail) -> Result<Option<User>, DomainError>;

    /// All users, credentials stripped
    async fn list_summaries(&self) -> Result<Vec<UserSummary>, DomainError>;

    async fn email_exists(&self, email: &UserEmail) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Number of stored users
    async fn count(&self) -> Result<usize, DomainError>;
}
