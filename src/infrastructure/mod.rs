//! Infrastructure layer - LDAP, Grafana and runtime plumbing

pub mod grafana;
pub mod ldap;
pub mod logging;
pub mod observability;
pub mod scheduler;
pub mod services;
