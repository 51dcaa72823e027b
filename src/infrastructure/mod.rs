//! Infrastructure layer - Storage, hashing, uploads and logging

pub mod logging;
pub mod storage;
pub mod upload;
pub mod user;
