//! Storage infrastructure - persistence backends and schema

mod factory;
mod in_memory;
pub mod migrations;
mod postgres;

pub use factory::{Repositories, StorageConfig, StorageFactory, StorageType};
pub use in_memory::{InMemoryDatabase, Tables};
pub use migrations::{run_migrations, Migration, Migrator, PostgresMigrator};
pub use postgres::{connect_pool, PostgresConfig};
