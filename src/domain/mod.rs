//! Domain layer - Core business types, rules and ports

pub mod error;
pub mod image;
pub mod storage;
pub mod user;

pub use error::DomainError;
pub use image::{AcceptedImage, ImageKind, ImageRejection, ImageStore, INVALID_IMAGE_FORMAT};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use user::{
    validate_email, validate_full_name, validate_password, PasswordRule, User, UserEmail,
    UserRepository, UserSummary, UserValidationError,
};
