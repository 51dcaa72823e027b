//! User Management API
//!
//! An HTTP service for user accounts:
//! - Create, edit, delete and list users under a configurable base path
//! - Salted password hashing (bcrypt by default, Argon2 optional)
//! - One profile image per user, stored on disk and served statically
//! - In-memory or PostgreSQL document storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::{anyhow, bail};
use tracing::info;

use api::state::AppState;
use config::StorageSettings;
use domain::storage::Storage;
use domain::user::User;
use infrastructure::{
    storage::{run_storage_migrations, PostgresConfig, StorageFactory, StorageType},
    upload::DiskImageStore,
    user::{ConfiguredHasher, ImageService, StorageUserRepository, UserService},
};

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = create_user_storage(&config.storage).await?;
    let repository = Arc::new(StorageUserRepository::new(storage));

    info!(
        algorithm = ?config.hashing.algorithm,
        "Password hashing configured"
    );
    let hasher = Arc::new(ConfiguredHasher::new(
        config.hashing.algorithm,
        config.hashing.bcrypt_cost,
    )?);

    info!(
        directory = %config.uploads.directory,
        prefix = %config.uploads.public_prefix,
        "Image uploads configured"
    );
    let image_store = Arc::new(DiskImageStore::new(
        &config.uploads.directory,
        config.uploads.public_prefix.clone(),
    ));

    Ok(AppState::new(
        Arc::new(UserService::new(repository.clone(), hasher)),
        Arc::new(ImageService::new(repository, image_store)),
    ))
}

/// Open the user document store selected by the storage settings
///
/// The PostgreSQL backend connects, applies pending migrations and then
/// shares the pool with the store.
pub async fn create_user_storage(
    settings: &StorageSettings,
) -> anyhow::Result<Arc<dyn Storage<User>>> {
    validate_table_name(&settings.table)?;

    let backend = StorageType::from_str(&settings.backend)
        .ok_or_else(|| anyhow!("Unknown storage backend '{}'", settings.backend))?;

    info!("Storage backend: {:?}", backend);

    match backend {
        StorageType::InMemory => Ok(StorageFactory::create_in_memory::<User>()),
        StorageType::Postgres => {
            let pool = connect_postgres(settings).await?;
            run_storage_migrations(&pool, &settings.table).await?;

            Ok(StorageFactory::create_postgres_with_pool::<User>(
                pool,
                &settings.table,
            ))
        }
    }
}

/// Connect to the configured PostgreSQL database
pub async fn connect_postgres(settings: &StorageSettings) -> anyhow::Result<sqlx::PgPool> {
    let url = settings
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow!("DATABASE_URL is required for the postgres storage backend"))?;

    info!("Connecting to PostgreSQL...");
    let pool = PostgresConfig::new(url)
        .with_max_connections(settings.max_connections)
        .connect()
        .await?;
    info!("PostgreSQL connection established");

    Ok(pool)
}

/// Table names are spliced into SQL, so only plain identifiers are allowed
pub fn validate_table_name(table: &str) -> anyhow::Result<()> {
    let mut chars = table.chars();
    let valid_start = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);

    if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("Invalid storage table name '{}'", table);
    }

    Ok(())
}
