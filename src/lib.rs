//! Knowledge base manager
//!
//! Stores uploaded documents in named knowledge bases and tracks each document
//! through its processing lifecycle:
//! - Knowledge bases with soft (archive) and hard (cascading) deletion
//! - Document upload with an on-disk tree per knowledge base
//! - Processing state machine `uploaded → parsing → vectorizing → indexing → completed`
//! - In-memory or PostgreSQL persistence

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::knowledge::UploadPolicy;
use api::state::AppState;
use config::StorageSettings;
use infrastructure::{
    filesystem::{LocalFileStore, StoragePathManager},
    identity::StaticOwnerResolver,
    services::{
        DocumentService, DocumentServiceDeps, KnowledgeBaseLocks, KnowledgeBaseService,
        LoggingProcessingDispatcher,
    },
    storage::{PostgresConfig, Repositories, StorageConfig, StorageFactory, StorageType},
};
use tracing::info;

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = storage_config_from_settings(&config.storage)?;
    info!(backend = ?storage_config.storage_type(), "Initializing storage");

    let repositories = StorageFactory::create(&storage_config).await?;

    Ok(create_app_state_with_repositories(config, repositories))
}

/// Wire services over already constructed repositories
pub fn create_app_state_with_repositories(
    config: &AppConfig,
    repositories: Repositories,
) -> AppState {
    let paths = StoragePathManager::new(&config.upload.base_dir);
    let locks = KnowledgeBaseLocks::new();

    let knowledge_base_service = KnowledgeBaseService::new(
        repositories.knowledge_bases.clone(),
        paths.clone(),
        locks.clone(),
    );

    let document_service = DocumentService::new(DocumentServiceDeps {
        documents: repositories.documents,
        knowledge_bases: repositories.knowledge_bases,
        chunks: repositories.chunks,
        file_store: Arc::new(LocalFileStore::new()),
        dispatcher: Arc::new(LoggingProcessingDispatcher::new()),
        paths,
        locks,
    });

    AppState::new(
        Arc::new(knowledge_base_service),
        Arc::new(document_service),
        Arc::new(StaticOwnerResolver::new(
            config.identity.default_owner_id.clone(),
        )),
        UploadPolicy::from_config(&config.upload),
    )
}

/// Translate storage settings into a backend selection.
///
/// PostgreSQL takes its URL from `storage.database_url`, then `DATABASE_URL`.
pub fn storage_config_from_settings(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    let storage_type = StorageType::from_str(&settings.backend)
        .ok_or_else(|| anyhow::anyhow!("Unknown storage backend '{}'", settings.backend))?;

    match storage_type {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => {
            let url = settings
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("PostgreSQL storage requires storage.database_url or DATABASE_URL")
                })?;

            Ok(StorageConfig::postgres(
                PostgresConfig::new(url)
                    .with_max_connections(settings.max_connections)
                    .with_min_connections(settings.min_connections)
                    .with_connect_timeout(settings.connect_timeout_secs)
                    .with_idle_timeout(settings.idle_timeout_secs),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_needs_no_url() {
        let config = storage_config_from_settings(&StorageSettings::default()).unwrap();
        assert_eq!(config.storage_type(), StorageType::InMemory);
    }

    #[test]
    fn test_postgres_backend_uses_configured_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://db/knowledge".to_string()),
            ..StorageSettings::default()
        };

        let config = storage_config_from_settings(&settings).unwrap();
        match config {
            StorageConfig::Postgres(pg) => assert_eq!(pg.url, "postgres://db/knowledge"),
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let settings = StorageSettings {
            backend: "sqlite".to_string(),
            ..StorageSettings::default()
        };

        assert!(storage_config_from_settings(&settings).is_err());
    }
}
