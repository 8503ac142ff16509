//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, IdentityConfig, LogFormat, LoggingConfig, ServerConfig, StorageSettings,
    UploadConfig,
};
