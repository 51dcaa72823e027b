//! User entity and related types

use serde::{Deserialize, Serialize};

use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::DomainError;

pub const USER_ALREADY_EXISTS: &str = "User already exists.";
pub const USER_NOT_FOUND: &str = "User not found.";
pub const IMAGE_ALREADY_EXISTS: &str = "Image already exists for this user.";

/// Email address identifying a user
///
/// The email is the natural key of the user document, so the store's key
/// uniqueness is the email uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserEmail(String);

impl UserEmail {
    pub fn new(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl StorageKey for UserEmail {
    fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserEmail {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for UserEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User document as persisted
///
/// Serialized shape: `{"fullName", "email", "password", "imagePath"}`.
/// `password` always holds a credential hash.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    full_name: String,
    email: UserEmail,
    #[serde(rename = "password")]
    password_hash: String,
    /// Public path of the profile image, empty until one is uploaded
    #[serde(default)]
    image_path: String,
}

impl User {
    /// Create a new user without an image
    pub fn new(
        full_name: impl Into<String>,
        email: UserEmail,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email,
            password_hash: password_hash.into(),
            image_path: String::new(),
        }
    }

    // Getters

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn email(&self) -> &UserEmail {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn has_image(&self) -> bool {
        !self.image_path.is_empty()
    }

    /// Public projection without credentials
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            full_name: self.full_name.clone(),
            email: self.email.as_str().to_string(),
        }
    }

    // Mutators

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.full_name = full_name.into();
    }

    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
    }

    /// Attach the profile image
    ///
    /// A user holds at most one image; once set the path never changes.
    pub fn attach_image(&mut self, image_path: impl Into<String>) -> Result<(), DomainError> {
        if self.has_image() {
            return Err(DomainError::conflict(IMAGE_ALREADY_EXISTS));
        }

        self.image_path = image_path.into();
        Ok(())
    }
}

impl StorageEntity for User {
    type Key = UserEmail;

    fn key(&self) -> &Self::Key {
        &self.email
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("image_path", &self.image_path)
            .finish()
    }
}

/// The fields of a user that may leave the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub full_name: String,
    pub email: String,
}
