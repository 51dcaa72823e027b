//! User lifecycle service: create, update, delete and list

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::user::{
    validate_email, validate_full_name, validate_password, User, UserEmail, UserRepository,
    UserSummary, UserValidationError, USER_ALREADY_EXISTS, USER_NOT_FOUND,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for creating a new user
///
/// Fields are optional because clients may omit them; an empty string counts
/// as omitted.
#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request for changing a user's name and/or password
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
}

/// A field value the client actually supplied
pub(crate) fn supplied(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// User service for account management
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher + 'static> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user
    ///
    /// Checks run in a fixed order and the first failure wins: presence of all
    /// fields, email format, name format, password strength, then uniqueness.
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, DomainError> {
        let (full_name, email, password) = match (
            supplied(request.full_name.as_deref()),
            supplied(request.email.as_deref()),
            supplied(request.password.as_deref()),
        ) {
            (Some(full_name), Some(email), Some(password)) => (full_name, email, password),
            _ => {
                warn!("Rejected user creation with missing fields");
                return Err(UserValidationError::MissingFields.into());
            }
        };

        debug!(email = %email, "Creating user");

        validate_email(email)?;
        validate_full_name(full_name)?;
        if let Err(e) = validate_password(password) {
            warn!(email = %email, error = %e, "Rejected weak password");
            return Err(e.into());
        }

        let email = UserEmail::new(email);
        if self.repository.email_exists(&email).await? {
            warn!(email = %email, "User already exists");
            return Err(DomainError::conflict(USER_ALREADY_EXISTS));
        }

        let password_hash = self.hash_password(password).await?;
        let user = self
            .repository
            .insert(User::new(full_name, email, password_hash))
            .await?;

        info!(email = %user.email(), "User created");
        Ok(user)
    }

    /// Update a user's name and/or password
    ///
    /// Fields that are not supplied stay unchanged. Every supplied field is
    /// validated before anything is written.
    pub async fn update(&self, request: UpdateUserRequest) -> Result<User, DomainError> {
        let email = supplied(request.email.as_deref())
            .map(UserEmail::new)
            .ok_or(UserValidationError::MissingEmail)?;

        debug!(email = %email, "Updating user");

        let mut user = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        let full_name = supplied(request.full_name.as_deref());
        let password = supplied(request.password.as_deref());

        if full_name.is_none() && password.is_none() {
            debug!(email = %email, "Nothing to update");
            return Ok(user);
        }

        if let Some(full_name) = full_name {
            validate_full_name(full_name)?;
        }
        if let Some(password) = password {
            if let Err(e) = validate_password(password) {
                warn!(email = %email, error = %e, "Rejected weak password");
                return Err(e.into());
            }
        }

        if let Some(full_name) = full_name {
            user.set_full_name(full_name);
        }
        if let Some(password) = password {
            user.set_password_hash(self.hash_password(password).await?);
        }

        let user = self
            .repository
            .update_existing(&user)
            .await
            .map_err(|e| match e {
                DomainError::NotFound { .. } => DomainError::not_found(USER_NOT_FOUND),
                other => other,
            })?;

        info!(email = %email, name_changed = full_name.is_some(), password_changed = password.is_some(), "User updated");
        Ok(user)
    }

    /// Delete a user by email
    pub async fn delete(&self, email: Option<&str>) -> Result<User, DomainError> {
        let email = supplied(email)
            .map(UserEmail::new)
            .ok_or(UserValidationError::MissingEmail)?;

        debug!(email = %email, "Deleting user");

        let removed = self
            .repository
            .delete_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        info!(email = %email, "User deleted");
        Ok(removed)
    }

    /// List all users without credentials
    pub async fn list(&self) -> Result<Vec<UserSummary>, DomainError> {
        debug!("Listing users");
        self.repository.list_summaries().await
    }

    /// Number of stored users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::storage::InMemoryStorage;
    use crate::infrastructure::user::password::BcryptHasher;
    use crate::infrastructure::user::StorageUserRepository;

    fn create_service() -> (UserService<MockUserRepository, BcryptHasher>, Arc<MockUserRepository>) {
        let repo = Arc::new(MockUserRepository::new());
        let hasher = Arc::new(BcryptHasher::with_cost(4));
        (UserService::new(repo.clone(), hasher), repo)
    }

    fn create_request(full_name: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            full_name: Some(full_name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    fn jane() -> CreateUserRequest {
        create_request("Jane Doe", "jane@example.com", "Secure123!")
    }

    fn update_request(email: &str, full_name: Option<&str>, password: Option<&str>) -> UpdateUserRequest {
        UpdateUserRequest {
            email: Some(email.to_string()),
            full_name: full_name.map(String::from),
            password: password.map(String::from),
        }
    }

    async fn stored(repo: &MockUserRepository, email: &str) -> Option<User> {
        repo.find_by_email(&UserEmail::new(email)).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let (service, repo) = create_service();

        let user = service.create(jane()).await.unwrap();

        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.email().as_str(), "jane@example.com");
        assert!(!user.has_image());
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_stores_hash_not_plaintext() {
        let (service, repo) = create_service();

        service.create(jane()).await.unwrap();

        let user = stored(&repo, "jane@example.com").await.unwrap();
        assert_ne!(user.password_hash(), "Secure123!");
        assert!(BcryptHasher::with_cost(4).verify("Secure123!", user.password_hash()));
    }

    #[tokio::test]
    async fn test_create_missing_fields() {
        let (service, repo) = create_service();

        let requests = vec![
            CreateUserRequest::default(),
            CreateUserRequest {
                full_name: None,
                ..jane()
            },
            CreateUserRequest {
                email: Some(String::new()),
                ..jane()
            },
            CreateUserRequest {
                password: None,
                ..jane()
            },
        ];

        for request in requests {
            let err = service.create(request).await.unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }));
            assert_eq!(err.message(), "All fields are required.");
        }
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_first_failing_rule_wins() {
        let (service, _) = create_service();

        let err = service
            .create(create_request("J4ne", "not-an-email", "weak"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid email format.");

        let err = service
            .create(create_request("J4ne", "jane@example.com", "weak"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Invalid full name format.");

        let err = service
            .create(create_request("Jane", "jane@example.com", "weak"))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Password does not meet security requirements.");
    }

    #[tokio::test]
    async fn test_create_rejects_weak_passwords() {
        let (service, repo) = create_service();

        for password in ["short1!", "alllowercase1!", "NoDigits!!", "NoSymbol123"] {
            let err = service
                .create(create_request("Jane Doe", "jane@example.com", password))
                .await
                .unwrap_err();

            assert!(matches!(err, DomainError::Validation { .. }));
            assert_eq!(err.message(), "Password does not meet security requirements.");
        }
        assert_eq!(repo.len().await, 0);
    }

    #[tokio::test]
    async fn test_create_accepts_long_email() {
        let (service, repo) = create_service();
        let email = format!("{}@example.com", "j".repeat(300));

        service
            .create(create_request("Jane Doe", &email, "Secure123!"))
            .await
            .unwrap();

        assert!(stored(&repo, &email).await.is_some());
    }

    #[tokio::test]
    async fn test_create_duplicate_email() {
        let (service, repo) = create_service();

        service.create(jane()).await.unwrap();
        let err = service
            .create(create_request("Other Jane", "jane@example.com", "Valid123!"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(err.message(), "User already exists.");
        assert_eq!(repo.len().await, 1);
        assert_eq!(stored(&repo, "jane@example.com").await.unwrap().full_name(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_create_duplicate_caught_by_store_constraint() {
        let (service, repo) = create_service();

        service.create(jane()).await.unwrap();
        repo.set_hide_existing(true).await;

        let err = service.create(jane()).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(err.message(), "User already exists.");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_persist_one_record() {
        let storage = Arc::new(InMemoryStorage::<User>::new());
        let repo = Arc::new(StorageUserRepository::new(storage.clone()));
        let service = Arc::new(UserService::new(repo, Arc::new(BcryptHasher::with_cost(4))));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.create(jane()).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert_eq!(e.message(), "User already exists."),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_full_name_keeps_password() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();
        let before = stored(&repo, "jane@example.com").await.unwrap();

        let user = service
            .update(update_request("jane@example.com", Some("Jane Dee"), None))
            .await
            .unwrap();

        assert_eq!(user.full_name(), "Jane Dee");
        let after = stored(&repo, "jane@example.com").await.unwrap();
        assert_eq!(after.full_name(), "Jane Dee");
        assert_eq!(after.password_hash(), before.password_hash());
    }

    #[tokio::test]
    async fn test_update_password_rehashes() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();

        service
            .update(update_request("jane@example.com", None, Some("Changed123?")))
            .await
            .unwrap();

        let user = stored(&repo, "jane@example.com").await.unwrap();
        assert_ne!(user.password_hash(), "Changed123?");
        assert!(BcryptHasher::with_cost(4).verify("Changed123?", user.password_hash()));
        assert!(!BcryptHasher::with_cost(4).verify("Secure123!", user.password_hash()));
        assert_eq!(user.full_name(), "Jane Doe");
    }

    #[tokio::test]
    async fn test_update_requires_email() {
        let (service, _) = create_service();

        let err = service
            .update(UpdateUserRequest {
                full_name: Some("Jane".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(err.message(), "Email is required.");
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let (service, _) = create_service();

        let err = service
            .update(update_request("ghost@example.com", Some("Ghost"), None))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.message(), "User not found.");
    }

    #[tokio::test]
    async fn test_update_invalid_name_leaves_record() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();

        let err = service
            .update(update_request("jane@example.com", Some("Jane D."), Some("Changed123?")))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid full name format.");
        let user = stored(&repo, "jane@example.com").await.unwrap();
        assert_eq!(user.full_name(), "Jane Doe");
        assert!(BcryptHasher::with_cost(4).verify("Secure123!", user.password_hash()));
    }

    #[tokio::test]
    async fn test_update_weak_password_leaves_record() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();
        let before = stored(&repo, "jane@example.com").await.unwrap();

        for password in ["short1!", "alllowercase1!", "NoDigits!!", "NoSymbol123"] {
            let err = service
                .update(update_request("jane@example.com", Some("Janet"), Some(password)))
                .await
                .unwrap_err();
            assert_eq!(err.message(), "Password does not meet security requirements.");
        }

        let after = stored(&repo, "jane@example.com").await.unwrap();
        assert_eq!(after.full_name(), "Jane Doe");
        assert_eq!(after.password_hash(), before.password_hash());
    }

    #[tokio::test]
    async fn test_update_without_fields_is_noop() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();
        let before = stored(&repo, "jane@example.com").await.unwrap();

        let user = service
            .update(update_request("jane@example.com", Some(""), None))
            .await
            .unwrap();

        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.password_hash(), before.password_hash());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (service, repo) = create_service();
        service.create(jane()).await.unwrap();

        let removed = service.delete(Some("jane@example.com")).await.unwrap();
        assert_eq!(removed.full_name(), "Jane Doe");
        assert_eq!(repo.len().await, 0);

        let err = service.delete(Some("jane@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(err.message(), "User not found.");
    }

    #[tokio::test]
    async fn test_delete_requires_email() {
        let (service, _) = create_service();

        for email in [None, Some("")] {
            let err = service.delete(email).await.unwrap_err();
            assert_eq!(err.message(), "Email is required.");
        }
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let (service, _) = create_service();
        service.create(jane()).await.unwrap();
        service
            .create(create_request("John Roe", "john@example.com", "Valid123!"))
            .await
            .unwrap();

        let mut users = service.list().await.unwrap();
        users.sort_by(|a, b| a.email.cmp(&b.email));

        assert_eq!(
            users,
            vec![
                UserSummary {
                    full_name: "Jane Doe".to_string(),
                    email: "jane@example.com".to_string(),
                },
                UserSummary {
                    full_name: "John Roe".to_string(),
                    email: "john@example.com".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_message() {
        let (service, repo) = create_service();
        repo.set_failure(Some("connection reset by peer")).await;

        let err = service.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Storage { .. }));
        assert_eq!(err.message(), "connection reset by peer");

        let err = service.create(jane()).await.unwrap_err();
        assert_eq!(err.message(), "connection reset by peer");
    }
}
