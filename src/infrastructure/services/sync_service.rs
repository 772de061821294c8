//! Sync service - serializes reconciliation passes and reports their outcome

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::domain::{OrganizationMapping, PassError, PassReport, SyncEngine, SyncError};
use crate::infrastructure::grafana::GrafanaClient;
use crate::infrastructure::ldap::LdapConnector;
use crate::infrastructure::observability::record_pass;

/// Anything that can run one reconciliation pass on demand
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SyncTrigger: Send + Sync {
    async fn trigger(&self) -> Result<PassReport, PassError>;
}

/// Runs passes against the configured mappings, one at a time
#[derive(Debug)]
pub struct SyncService {
    engine: SyncEngine,
    mappings: Vec<OrganizationMapping>,
    running: Mutex<()>,
}

impl SyncService {
    pub fn new(engine: SyncEngine, mappings: Vec<OrganizationMapping>) -> Self {
        Self {
            engine,
            mappings,
            running: Mutex::new(()),
        }
    }

    /// Validate the configuration and wire the LDAP and Grafana adapters
    pub fn from_config(config: &AppConfig) -> Result<Self, SyncError> {
        config.validate()?;

        let mappings = config.mappings()?;
        let directory = Arc::new(LdapConnector::new(config.ldap.clone()));
        let teams = Arc::new(
            GrafanaClient::new(config.grafana.clone())
                .map_err(|e| SyncError::config_invalid(e.to_string()))?,
        );
        let engine = SyncEngine::new(directory, teams, config.sync_settings());

        Ok(Self::new(engine, mappings))
    }

    pub fn mappings(&self) -> &[OrganizationMapping] {
        &self.mappings
    }

    /// Run one pass. A pass already in flight is awaited first.
    pub async fn run(&self) -> Result<PassReport, PassError> {
        let _guard = self.running.lock().await;
        let start = Instant::now();

        info!(orgs = self.mappings.len(), "Sync pass started");

        let result = match self.engine.run_pass(&self.mappings).await {
            Ok(report) => report.into_result(),
            Err(e) => Err(PassError::Aborted(e)),
        };

        let elapsed = start.elapsed();
        record_pass(&result, elapsed);

        match &result {
            Ok(report) => info!(
                teams_converged = report.teams_converged(),
                teams_created = report.teams_created(),
                duration_ms = elapsed.as_millis() as u64,
                "Sync pass succeeded"
            ),
            Err(PassError::Aborted(e)) => error!(
                error = %e,
                kind = e.kind(),
                duration_ms = elapsed.as_millis() as u64,
                "Sync pass aborted"
            ),
            Err(PassError::Incomplete(report)) => warn!(
                failures = report.failure_count(),
                teams_converged = report.teams_converged(),
                duration_ms = elapsed.as_millis() as u64,
                summary = %report.summary(),
                "Sync pass completed with errors"
            ),
        }

        result
    }
}

#[async_trait]
impl SyncTrigger for SyncService {
    async fn trigger(&self) -> Result<PassReport, PassError> {
        self.run().await
    }
}
