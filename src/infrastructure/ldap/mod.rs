//! LDAP directory adapter

mod config;
mod connector;

pub use config::{LdapAttributes, LdapConfig, TlsMode};
pub use connector::LdapConnector;
