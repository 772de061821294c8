//! Grafana team API adapter

mod client;
mod config;
mod types;

pub use client::GrafanaClient;
pub use config::GrafanaConfig;
