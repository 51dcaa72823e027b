//! Password hashing with bcrypt (default) or Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::Deserialize;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Work factor used for new bcrypt hashes
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Work factors bcrypt accepts
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Which hasher the service is built with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Bcrypt,
    Argon2,
}

/// Hasher chosen at startup from configuration
#[derive(Debug, Clone)]
pub enum ConfiguredHasher {
    Bcrypt(BcryptHasher),
    Argon2(Argon2Hasher),
}

impl ConfiguredHasher {
    /// Build the configured hasher, rejecting a bcrypt cost bcrypt cannot use
    pub fn new(algorithm: HashAlgorithm, bcrypt_cost: u32) -> Result<Self, DomainError> {
        match algorithm {
            HashAlgorithm::Bcrypt => {
                if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
                    return Err(DomainError::configuration(format!(
                        "hashing.bcrypt_cost must be between {} and {}, got {}",
                        BCRYPT_COST_RANGE.start(),
                        BCRYPT_COST_RANGE.end(),
                        bcrypt_cost
                    )));
                }
                Ok(Self::Bcrypt(BcryptHasher::with_cost(bcrypt_cost)))
            }
            HashAlgorithm::Argon2 => Ok(Self::Argon2(Argon2Hasher::new())),
        }
    }
}

impl PasswordHasher for ConfiguredHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        match self {
            Self::Bcrypt(h) => h.hash(password),
            Self::Argon2(h) => h.hash(password),
        }
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        match self {
            Self::Bcrypt(h) => h.verify(password, hash),
            Self::Argon2(h) => h.verify(password, hash),
        }
    }
}

/// bcrypt-based password hasher
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with a custom work factor
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    /// Create a new Argon2 hasher
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
