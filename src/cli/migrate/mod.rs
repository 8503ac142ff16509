//! Migrate command - manages the PostgreSQL schema

use clap::{Args, ValueEnum};
use tracing::info;

use crate::infrastructure::storage::{connect_pool, Migrator, PostgresMigrator, StorageConfig};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[arg(value_enum, default_value_t = MigrateAction::Up)]
    pub action: MigrateAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MigrateAction {
    /// Apply pending migrations
    Up,
    /// Revert the latest migration
    Down,
    /// Print the current schema version
    Status,
}

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();

    let StorageConfig::Postgres(pg_config) =
        crate::storage_config_from_settings(&config.storage)?
    else {
        anyhow::bail!("Migrations require storage.backend = \"postgres\"");
    };

    let pool = connect_pool(&pg_config).await?;
    let migrator = PostgresMigrator::new(pool);

    match args.action {
        MigrateAction::Up => {
            let applied = migrator.run().await?;
            info!(applied, "Migrations applied");
        }
        MigrateAction::Down => match migrator.revert().await? {
            Some(version) => info!(version, "Migration reverted"),
            None => info!("No migration to revert"),
        },
        MigrateAction::Status => match migrator.version().await? {
            Some(version) => info!(version, "Schema version"),
            None => info!("No migrations applied"),
        },
    }

    Ok(())
}
