//! LDAP connection configuration

use std::time::Duration;

use serde::Deserialize;

/// Attributes read from directory entries
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LdapAttributes {
    #[serde(default = "default_email_attribute")]
    pub email: String,
}

impl Default for LdapAttributes {
    fn default() -> Self {
        Self {
            email: default_email_attribute(),
        }
    }
}

fn default_email_attribute() -> String {
    "mail".to_string()
}

/// How the connection is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// Plain `ldap://`
    None,
    /// `ldap://` upgraded with StartTLS
    StartTls,
    /// `ldaps://` from the first byte
    Ldaps,
}

/// LDAP server settings
#[derive(Clone, Deserialize)]
pub struct LdapConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub use_ssl: bool,
    #[serde(default)]
    pub start_tls: bool,
    #[serde(default)]
    pub insecure_skip_verify: bool,
    #[serde(default)]
    pub bind_dn: String,
    #[serde(default)]
    pub password: String,
    pub base_dn: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, alias = "server_attributes")]
    pub attributes: LdapAttributes,
}

fn default_timeout_secs() -> u64 {
    10
}

impl LdapConfig {
    pub fn tls_mode(&self) -> TlsMode {
        if self.use_ssl {
            TlsMode::Ldaps
        } else if self.start_tls {
            TlsMode::StartTls
        } else {
            TlsMode::None
        }
    }

    /// Configured port, or the protocol default (636 for LDAPS, 389 otherwise)
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(match self.tls_mode() {
            TlsMode::Ldaps => 636,
            _ => 389,
        })
    }

    pub fn url(&self) -> String {
        let scheme = match self.tls_mode() {
            TlsMode::Ldaps => "ldaps",
            _ => "ldap",
        };
        format!("{}://{}:{}", scheme, self.host, self.effective_port())
    }

    /// Bound applied to connect and to every directory operation
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConfig")
            .field("host", &self.host)
            .field("port", &self.effective_port())
            .field("tls_mode", &self.tls_mode())
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("bind_dn", &self.bind_dn)
            .field("password", &"[REDACTED]")
            .field("base_dn", &self.base_dn)
            .field("timeout_secs", &self.timeout_secs)
            .field("attributes", &self.attributes)
            .finish()
    }
}
