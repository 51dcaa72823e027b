//! User domain
//!
//! This module provides the user document, the field validators that guard
//! every mutation, and the record store trait.

mod entity;
mod repository;
mod validation;

pub use entity::{
    User, UserEmail, UserSummary, IMAGE_ALREADY_EXISTS, USER_ALREADY_EXISTS, USER_NOT_FOUND,
};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_full_name, validate_password, PasswordRule, UserValidationError,
    MIN_PASSWORD_LENGTH, PASSWORD_SYMBOLS,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
