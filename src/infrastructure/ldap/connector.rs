//! ldap3-backed directory connector

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{DerefAliases, Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry, SearchOptions};
use tracing::{debug, warn};

use super::config::{LdapConfig, TlsMode};
use crate::domain::directory::{
    DirectoryConnector, DirectoryEntry, DirectorySession, SearchRequest, SearchScope,
};
use crate::domain::DomainError;

/// Opens one LDAP connection per call to [`DirectoryConnector::connect`]
#[derive(Debug, Clone)]
pub struct LdapConnector {
    config: Arc<LdapConfig>,
}

impl LdapConnector {
    pub fn new(config: LdapConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn settings(&self) -> LdapConnSettings {
        LdapConnSettings::new()
            .set_conn_timeout(self.config.timeout())
            .set_starttls(self.config.tls_mode() == TlsMode::StartTls)
            .set_no_tls_verify(self.config.insecure_skip_verify)
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn connect(&self) -> Result<Box<dyn DirectorySession>, DomainError> {
        let url = self.config.url();
        debug!(url = %url, tls = ?self.config.tls_mode(), "Connecting to LDAP server");

        let (conn, ldap) = LdapConnAsync::with_settings(self.settings(), &url)
            .await
            .map_err(|e| {
                DomainError::directory_connect(format!("failed to connect to {}: {}", url, e))
            })?;

        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        Ok(Box::new(LdapSession {
            ldap,
            timeout: self.config.timeout(),
        }))
    }
}

struct LdapSession {
    ldap: Ldap,
    timeout: Duration,
}

fn to_ldap3_scope(scope: SearchScope) -> Scope {
    match scope {
        SearchScope::Base => Scope::Base,
        SearchScope::OneLevel => Scope::OneLevel,
        SearchScope::Subtree => Scope::Subtree,
    }
}

#[async_trait]
impl DirectorySession for LdapSession {
    async fn bind(&mut self, bind_dn: &str, password: &str) -> Result<(), DomainError> {
        debug!(bind_dn = %bind_dn, "Performing LDAP bind");

        self.ldap
            .with_timeout(self.timeout)
            .simple_bind(bind_dn, password)
            .await
            .map_err(|e| DomainError::directory_bind(format!("bind as {} failed: {}", bind_dn, e)))?
            .success()
            .map_err(|e| DomainError::directory_bind(format!("bind as {} rejected: {}", bind_dn, e)))?;

        Ok(())
    }

    async fn search(&mut self, request: &SearchRequest) -> Result<Vec<DirectoryEntry>, DomainError> {
        let attributes: Vec<&str> = request.attributes.iter().map(String::as_str).collect();

        let (entries, _result) = self
            .ldap
            .with_search_options(SearchOptions::new().deref(DerefAliases::Never))
            .with_timeout(self.timeout)
            .search(
                &request.base_dn,
                to_ldap3_scope(request.scope),
                &request.filter,
                attributes,
            )
            .await
            .map_err(|e| DomainError::directory_search(e.to_string()))?
            .success()
            .map_err(|e| DomainError::directory_search(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(SearchEntry::construct)
            .map(|entry| DirectoryEntry {
                dn: entry.dn,
                attributes: entry.attrs,
            })
            .collect())
    }

    async fn close(mut self: Box<Self>) {
        if let Err(e) = self.ldap.unbind().await {
            warn!(error = %e, "Error during LDAP unbind");
        }
    }
}
