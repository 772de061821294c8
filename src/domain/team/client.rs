//! Remote team directory trait

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::entity::{OrgUser, RemoteTeam, RemoteTeamId};
use crate::domain::mapping::OrgId;
use crate::domain::DomainError;

/// Team operations against the remote team-management API
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamDirectory: Send + Sync {
    /// Look up a team by exact name. `Ok(None)` means the team does not exist.
    async fn find_team_by_name(
        &self,
        org_id: OrgId,
        name: &str,
    ) -> Result<Option<RemoteTeam>, DomainError>;

    /// Create a team and return its new ID
    async fn create_team(&self, org_id: OrgId, name: &str) -> Result<RemoteTeamId, DomainError>;

    /// Replace the full membership of a team
    async fn replace_members(
        &self,
        org_id: OrgId,
        team_id: RemoteTeamId,
        members: &[String],
        admins: &[String],
    ) -> Result<(), DomainError>;

    /// List the users of an organization
    async fn list_org_users(&self, org_id: OrgId) -> Result<Vec<OrgUser>, DomainError>;
}
