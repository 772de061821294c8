use std::collections::HashSet;
use std::path::Path;

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;

use crate::domain::mapping::MappingValidationError;
use crate::domain::{OrgId, OrganizationMapping, SyncError, SyncSettings, TeamSpec};
use crate::infrastructure::grafana::GrafanaConfig;
use crate::infrastructure::ldap::LdapConfig;
use crate::infrastructure::observability::MetricsConfig;
use crate::infrastructure::scheduler::parse_schedule;

const ENV_PREFIX: &str = "TEAMSYNC";

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub ldap: LdapConfig,
    pub grafana: GrafanaConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub mapping: Vec<MappingConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Scheduled sync settings
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_schedule")]
    pub schedule: String,
    /// Drop emails that are not users of the target organization
    #[serde(default)]
    pub filter_unknown_users: bool,
}

/// Teams of one organization, as written in the mapping file
#[derive(Debug, Clone, Deserialize)]
pub struct MappingConfig {
    pub org_id: i64,
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub admin_user_filter: Option<String>,
    #[serde(default)]
    pub member_user_filter: Option<String>,
}

fn default_schedule() -> String {
    "*/5 * * * *".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            schedule: default_schedule(),
            filter_unknown_users: false,
        }
    }
}

impl AppConfig {
    /// Load the main config file, then the mapping file, then `TEAMSYNC__*`
    /// environment overrides.
    pub fn load(
        config_path: impl AsRef<Path>,
        mapping_path: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from(config_path.as_ref()).required(true))
            .add_source(config::File::from(mapping_path.as_ref()).required(false));

        Self::build(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Check everything the sync core relies on before any pass runs
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.ldap.host.trim().is_empty() {
            return Err(SyncError::config_invalid("ldap.host must be specified"));
        }

        if self.ldap.base_dn.trim().is_empty() {
            return Err(SyncError::config_invalid("ldap.base_dn must be specified"));
        }

        if self.ldap.attributes.email.trim().is_empty() {
            return Err(SyncError::config_invalid(
                "ldap.attributes.email must be specified",
            ));
        }

        if self.ldap.timeout_secs == 0 {
            return Err(SyncError::config_invalid(
                "ldap.timeout_secs must be greater than 0",
            ));
        }

        if self.grafana.timeout_secs == 0 {
            return Err(SyncError::config_invalid(
                "grafana.timeout_secs must be greater than 0",
            ));
        }

        let url = reqwest::Url::parse(&self.grafana.url).map_err(|e| {
            SyncError::config_invalid(format!("grafana.url '{}' is invalid: {}", self.grafana.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::config_invalid(format!(
                "grafana.url '{}' must use http or https",
                self.grafana.url
            )));
        }

        if self.sync.enabled {
            parse_schedule(&self.sync.schedule)
                .map_err(|e| SyncError::config_invalid(e.to_string()))?;
        }

        self.mappings().map(|_| ())
    }

    /// Build validated organization mappings
    pub fn mappings(&self) -> Result<Vec<OrganizationMapping>, SyncError> {
        let mut seen = HashSet::new();
        let mut mappings = Vec::with_capacity(self.mapping.len());

        for entry in &self.mapping {
            let org_id =
                OrgId::new(entry.org_id).map_err(|e| SyncError::config_invalid(e.to_string()))?;

            if !seen.insert(org_id) {
                return Err(SyncError::config_invalid(
                    MappingValidationError::DuplicateOrgId(org_id.get()).to_string(),
                ));
            }

            let teams = entry
                .teams
                .iter()
                .map(|team| {
                    TeamSpec::new(
                        org_id,
                        team.name.clone(),
                        team.admin_user_filter.clone(),
                        team.member_user_filter.clone(),
                    )
                    .map_err(|e| SyncError::config_invalid(e.to_string()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            mappings.push(OrganizationMapping::new(org_id, teams));
        }

        Ok(mappings)
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            bind_dn: self.ldap.bind_dn.clone(),
            bind_password: self.ldap.password.clone(),
            base_dn: self.ldap.base_dn.clone(),
            email_attribute: self.ldap.attributes.email.clone(),
            filter_unknown_users: self.sync.filter_unknown_users,
        }
    }

    /// Server listen address
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::infrastructure::ldap::TlsMode;

    #[test]
    fn test_parse_full_config() {
        let config = app_config();

        assert_eq!(config.listen_address(), "127.0.0.1:9090");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.metrics.enabled);
        assert_eq!(config.ldap.tls_mode(), TlsMode::None);
        assert_eq!(config.ldap.effective_port(), 389);
        assert_eq!(config.ldap.attributes.email, "mail");
        assert!(config.sync.enabled);
        assert!(!config.sync.filter_unknown_users);
        assert_eq!(config.mapping.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mappings_are_built_in_order() {
        let mappings = app_config().mappings().unwrap();

        assert_eq!(mappings.len(), 2);
        assert_eq!(mappings[0].org_id().get(), 1);
        assert_eq!(mappings[0].teams().len(), 2);
        assert_eq!(mappings[0].teams()[1].name(), "oncall");
        assert_eq!(mappings[0].teams()[1].admin_filter(), None);
        assert_eq!(mappings[1].org_id().get(), 3);
    }

    #[test]
    fn test_sync_settings_from_ldap_section() {
        let settings = app_config().sync_settings();

        assert_eq!(settings.bind_dn, "cn=admin,dc=example,dc=com");
        assert_eq!(settings.bind_password, "secret");
        assert_eq!(settings.base_dn, "dc=example,dc=com");
        assert_eq!(settings.email_attribute, "mail");
        assert!(!settings.filter_unknown_users);
    }

    #[test]
    fn test_team_without_filters_is_rejected() {
        let mapping = r#"
mapping:
  - org_id: 2
    teams:
      - name: ghosts
        admin_user_filter: ""
"#;
        let config = parse(CONFIG_YAML, mapping).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SyncError::ConfigInvalid { .. }));
        assert!(err.to_string().contains(
            "one of admin_user_filter or member_user_filter must be specified for team ghosts in orgId 2"
        ));
    }

    #[test]
    fn test_duplicate_org_is_rejected() {
        let mapping = r#"
mapping:
  - org_id: 1
    teams:
      - name: a
        member_user_filter: "(cn=a)"
  - org_id: 1
    teams:
      - name: b
        member_user_filter: "(cn=b)"
"#;
        let err = parse(CONFIG_YAML, mapping).unwrap().validate().unwrap_err();

        assert!(err.to_string().contains("org_id 1 is mapped more than once"));
    }

    #[test]
    fn test_non_positive_org_is_rejected() {
        let mapping = r#"
mapping:
  - org_id: 0
    teams: []
"#;
        let config = parse(CONFIG_YAML, mapping).unwrap();

        assert!(matches!(
            config.validate(),
            Err(SyncError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_invalid_grafana_url_is_rejected() {
        let mut config = app_config();
        config.grafana.url = "grafana:3000/api".to_string();
        assert!(config.validate().is_err());

        config.grafana.url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_schedule_only_matters_when_enabled() {
        let mut config = app_config();
        config.sync.schedule = "whenever".to_string();
        assert!(config.validate().is_err());

        config.sync.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_base_dn_is_rejected() {
        let mut config = app_config();
        config.ldap.base_dn = " ".to_string();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ldap.base_dn"));
    }

    #[test]
    fn test_zero_timeouts_are_rejected() {
        let mut config = fixtures::app_config();
        config.ldap.timeout_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SyncError::ConfigInvalid { .. }));
        assert!(err.to_string().contains("ldap.timeout_secs"));

        let mut config = fixtures::app_config();
        config.grafana.timeout_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SyncError::ConfigInvalid { .. }));
        assert!(err.to_string().contains("grafana.timeout_secs"));
    }

    #[test]
    fn test_defaults_without_optional_sections() {
        let minimal = r#"
ldap:
  host: ldap
  base_dn: dc=example,dc=com
grafana:
  url: https://grafana.example.com
"#;
        let config = parse(minimal, "").unwrap();

        assert_eq!(config.listen_address(), "0.0.0.0:8080");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.schedule, "*/5 * * * *");
        assert!(config.mapping.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_config_file_fails() {
        let result = AppConfig::load("/nonexistent/config.yaml", "/nonexistent/mapping.yaml");

        assert!(result.is_err());
    }
}
