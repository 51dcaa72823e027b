//! Storage infrastructure - Document store implementations

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{StorageFactory, StorageType};
pub use in_memory::InMemoryStorage;
pub use migrations::{run_storage_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{document_table_ddl, PostgresConfig, PostgresStorage};
