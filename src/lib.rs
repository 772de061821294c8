//! Grafana team sync
//!
//! Reconciles Grafana team membership from LDAP group filters:
//! - Admin and member filters per team, per organization
//! - Missing teams are created, membership is replaced wholesale
//! - One-shot CLI runs, an HTTP trigger and a cron schedule

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;
