//! User infrastructure module
//!
//! This module provides password hashing (bcrypt or Argon2), the
//! storage-backed user repository, the account lifecycle service and the
//! profile image service.

mod image_service;
mod password;
mod repository;
mod service;

pub use image_service::{ImageService, IMAGE_UPLOAD_FAILED};
pub use password::{
    Argon2Hasher, BcryptHasher, ConfiguredHasher, HashAlgorithm, PasswordHasher,
    DEFAULT_BCRYPT_COST,
};
pub use repository::StorageUserRepository;
pub use service::{CreateUserRequest, UpdateUserRequest, UserService};
