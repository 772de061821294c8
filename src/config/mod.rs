//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, LogFormat, LoggingConfig, MappingConfig, ServerConfig, SyncConfig, TeamConfig,
};

#[cfg(test)]
pub(crate) use app_config::fixtures;
