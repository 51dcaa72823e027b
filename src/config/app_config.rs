use serde::Deserialize;

use crate::infrastructure::user::{HashAlgorithm, DEFAULT_BCRYPT_COST};

/// Application configuration
///
/// Layered from `config/default`, `config/local` and `APP__*` environment
/// variables, then `PORT` and `DATABASE_URL` on top.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageSettings,
    pub uploads: UploadConfig,
    pub hashing: HashingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix for the user routes
    pub base_path: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory uploaded images are written to
    pub directory: String,
    /// URL prefix the directory is served under
    pub public_prefix: String,
    /// Largest accepted upload in bytes
    pub max_file_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    pub algorithm: HashAlgorithm,
    pub bcrypt_cost: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            base_path: "/user".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            database_url: None,
            max_connections: 10,
            table: "users".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: "images".to_string(),
            public_prefix: "/images".to_string(),
            max_file_size: 5 * 1024 * 1024,
        }
    }
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::default(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_overrides(|name| std::env::var(name).ok())?;

        Ok(app_config)
    }

    /// Apply the plain `PORT` and `DATABASE_URL` variables
    ///
    /// A database URL switches the storage backend to PostgreSQL.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .parse()
                .map_err(|_| config::ConfigError::Message(format!("Invalid PORT: {}", port)))?;
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.is_empty()) {
            self.set_database_url(url);
        }

        Ok(())
    }

    pub fn set_database_url(&mut self, url: impl Into<String>) {
        self.storage.database_url = Some(url.into());
        self.storage.backend = "postgres".to_string();
    }
}
