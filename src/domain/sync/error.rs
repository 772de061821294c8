//! Reconciliation error taxonomy

use thiserror::Error;

use crate::domain::mapping::OrgId;
use crate::domain::team::RemoteTeamId;
use crate::domain::DomainError;

/// How far an error reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    /// Nothing can run
    Pass,
    /// The remaining teams of one organization are skipped
    Organization,
    /// Only one team is affected
    Team,
}

/// Failures of a reconciliation pass
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("invalid configuration: {message}")]
    ConfigInvalid { message: String },

    #[error("{reason}")]
    DirectoryConnectFailed { reason: DomainError },

    #[error("{reason}")]
    DirectoryBindFailed { reason: DomainError },

    #[error("failed to get users for filter {filter}: {reason}")]
    DirectoryQueryFailed { filter: String, reason: DomainError },

    #[error("error fetching team {team} in orgId {org_id}: {reason}")]
    RemoteLookupFailed {
        org_id: OrgId,
        team: String,
        reason: DomainError,
    },

    #[error("error adding team {team} in orgId {org_id}: {reason}")]
    RemoteCreateFailed {
        org_id: OrgId,
        team: String,
        reason: DomainError,
    },

    #[error("error bulk updating members of team {team} (id {team_id}) in orgId {org_id}: {reason}")]
    RemoteUpdateFailed {
        org_id: OrgId,
        team: String,
        team_id: RemoteTeamId,
        reason: DomainError,
    },

    #[error("error listing users of orgId {org_id}: {reason}")]
    RemoteSnapshotFailed { org_id: OrgId, reason: DomainError },
}

impl SyncError {
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn scope(&self) -> ErrorScope {
        match self {
            Self::ConfigInvalid { .. }
            | Self::DirectoryConnectFailed { .. }
            | Self::DirectoryBindFailed { .. } => ErrorScope::Pass,
            Self::RemoteSnapshotFailed { .. } => ErrorScope::Organization,
            Self::DirectoryQueryFailed { .. }
            | Self::RemoteLookupFailed { .. }
            | Self::RemoteCreateFailed { .. }
            | Self::RemoteUpdateFailed { .. } => ErrorScope::Team,
        }
    }

    /// Whether this error stops the whole pass
    pub fn is_fatal(&self) -> bool {
        self.scope() == ErrorScope::Pass
    }

    /// Stable machine-readable name, used for metric labels
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigInvalid { .. } => "config_invalid",
            Self::DirectoryConnectFailed { .. } => "directory_connect_failed",
            Self::DirectoryBindFailed { .. } => "directory_bind_failed",
            Self::DirectoryQueryFailed { .. } => "directory_query_failed",
            Self::RemoteLookupFailed { .. } => "remote_lookup_failed",
            Self::RemoteCreateFailed { .. } => "remote_create_failed",
            Self::RemoteUpdateFailed { .. } => "remote_update_failed",
            Self::RemoteSnapshotFailed { .. } => "remote_snapshot_failed",
        }
    }
}
