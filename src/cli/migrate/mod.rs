//! Migrate command - applies the user table schema and exits

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{migrations::user_migrations, Migrator, PostgresMigrator};

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// PostgreSQL connection string
    #[arg(long)]
    pub database_url: Option<String>,

    /// Table holding user documents
    #[arg(long)]
    pub table: Option<String>,
}

/// Run all pending migrations
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    if let Some(url) = args.database_url {
        config.set_database_url(url);
    }
    if let Some(table) = args.table {
        config.storage.table = table;
    }
    logging::init_logging(&config.logging)?;
    crate::validate_table_name(&config.storage.table)?;

    let pool = crate::connect_postgres(&config.storage).await?;
    let migrator = PostgresMigrator::new(pool);

    migrator.run(&user_migrations(&config.storage.table)).await?;

    let version = migrator.version().await?;
    info!(
        table = %config.storage.table,
        version = ?version,
        "Migrations complete"
    );

    Ok(())
}
