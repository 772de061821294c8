//! Pass outcome aggregation

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::error::SyncError;
use crate::domain::mapping::OrgId;

/// One failure, located by organization and (when team-scoped) team
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub org_id: OrgId,
    pub team: Option<String>,
    pub error: SyncError,
}

/// What happened inside one organization during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgReport {
    org_id: OrgId,
    converged: Vec<String>,
    created: Vec<String>,
    dropped_unknown: usize,
    failures: Vec<FailureRecord>,
}

impl OrgReport {
    pub fn new(org_id: OrgId) -> Self {
        Self {
            org_id,
            converged: Vec::new(),
            created: Vec::new(),
            dropped_unknown: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_converged(&mut self, team: impl Into<String>, created: bool) {
        let team = team.into();
        if created {
            self.created.push(team.clone());
        }
        self.converged.push(team);
    }

    pub fn record_dropped_unknown(&mut self, count: usize) {
        self.dropped_unknown += count;
    }

    pub fn record_team_failure(&mut self, team: impl Into<String>, error: SyncError) {
        self.failures.push(FailureRecord {
            org_id: self.org_id,
            team: Some(team.into()),
            error,
        });
    }

    pub fn record_org_failure(&mut self, error: SyncError) {
        self.failures.push(FailureRecord {
            org_id: self.org_id,
            team: None,
            error,
        });
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    /// Teams whose membership was written successfully
    pub fn converged(&self) -> &[String] {
        &self.converged
    }

    /// Teams that had to be created during the pass
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Emails dropped because the organization does not know them
    pub fn dropped_unknown(&self) -> usize {
        self.dropped_unknown
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Aggregated outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    orgs: Vec<OrgReport>,
}

impl PassReport {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            orgs: Vec::new(),
        }
    }

    pub fn push(&mut self, org: OrgReport) {
        self.orgs.push(org);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn orgs(&self) -> &[OrgReport] {
        &self.orgs
    }

    pub fn failures(&self) -> impl Iterator<Item = &FailureRecord> {
        self.orgs.iter().flat_map(|o| o.failures.iter())
    }

    pub fn failure_count(&self) -> usize {
        self.orgs.iter().map(|o| o.failures.len()).sum()
    }

    pub fn teams_converged(&self) -> usize {
        self.orgs.iter().map(|o| o.converged.len()).sum()
    }

    pub fn teams_created(&self) -> usize {
        self.orgs.iter().map(|o| o.created.len()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failure_count() == 0
    }

    /// Whether any recorded failure is fatal
    pub fn has_fatal(&self) -> bool {
        self.failures().any(|f| f.error.is_fatal())
    }

    /// One line per failure joined with "; "
    pub fn summary(&self) -> String {
        self.failures()
            .map(|f| f.error.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Turn any recorded failure into an error for the caller
    pub fn into_result(self) -> Result<Self, PassError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(PassError::Incomplete(self))
        }
    }
}

impl Default for PassReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level error handed to the trigger shell
#[derive(Debug, Clone, Error)]
pub enum PassError {
    /// The pass never reached the teams
    #[error("{0}")]
    Aborted(SyncError),

    /// The pass ran but some organizations or teams failed
    #[error("sync completed with {} error(s): {}", .0.failure_count(), .0.summary())]
    Incomplete(PassReport),
}

impl PassError {
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Aborted(error) => error.is_fatal(),
            Self::Incomplete(report) => report.has_fatal(),
        }
    }

    /// The partial report, when the pass ran
    pub fn report(&self) -> Option<&PassReport> {
        match self {
            Self::Aborted(_) => None,
            Self::Incomplete(report) => Some(report),
        }
    }
}

impl From<SyncError> for PassError {
    fn from(error: SyncError) -> Self {
        Self::Aborted(error)
    }
}
