use std::time::Duration;

use serde::Deserialize;

/// Grafana API settings. Credentials are normally supplied through the
/// environment rather than the config file.
#[derive(Clone, Deserialize)]
pub struct GrafanaConfig {
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl GrafanaConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Basic auth credentials, only when both halves are set
    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        if self.user.is_empty() || self.password.is_empty() {
            return None;
        }
        Some((self.user.as_str(), self.password.as_str()))
    }
}

impl std::fmt::Debug for GrafanaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrafanaConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
