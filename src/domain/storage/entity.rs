//! Document traits for the storage layer

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Natural key of a stored document
///
/// Backends index documents by the string form of the key, and the key is
/// unique within one collection.
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    fn as_str(&self) -> &str;
}

/// A document that can be persisted as JSON
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    struct Address(String);

    impl StorageKey for Address {
        fn as_str(&self) -> &str {
            &self.0
        }
    }

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct Mailbox {
        address: Address,
        owner: String,
    }

    impl StorageEntity for Mailbox {
        type Key = Address;

        fn key(&self) -> &Self::Key {
            &self.address
        }
    }

    #[test]
    fn test_entity_exposes_its_key() {
        let mailbox = Mailbox {
            address: Address("jane@example.com".to_string()),
            owner: "Jane Doe".to_string(),
        };

        assert_eq!(mailbox.key().as_str(), "jane@example.com");
        assert_eq!(mailbox.owner, "Jane Doe");
    }
}
