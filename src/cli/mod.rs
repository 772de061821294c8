//! CLI module for grafana-team-sync
//!
//! Provides subcommands for running the reconciliation:
//! - `sync`: run one pass and exit
//! - `server`: HTTP trigger surface plus the cron scheduler

pub mod server;
pub mod sync;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Grafana team sync - keep Grafana team membership in line with LDAP
#[derive(Parser)]
#[command(name = "grafana-team-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand
#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Main configuration file
    #[arg(long, global = true, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Team mapping file
    #[arg(long, global = true, default_value = "mapping.yaml")]
    pub mapping: PathBuf,

    /// Override the configured log level
    #[arg(long, global = true, hide = true)]
    pub level: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a single sync pass and exit
    Sync,

    /// Serve the sync endpoint and run scheduled passes
    Server(server::ServerArgs),
}

/// Load `.env`, the configuration files and install logging
pub fn bootstrap(global: &GlobalArgs) -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load(&global.config, &global.mapping).map_err(|e| {
        anyhow::anyhow!(
            "failed to load configuration from {} and {}: {}",
            global.config.display(),
            global.mapping.display(),
            e
        )
    })?;

    if let Some(level) = &global.level {
        config.logging.level = level.clone();
    }

    logging::init_logging(&config.logging);

    Ok(config)
}
