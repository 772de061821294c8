//! Reconciliation engine
//!
//! One pass opens a single directory connection, walks every organization
//! and team in configured order, and converges each remote team to the
//! membership derived from its LDAP filters. Failures are isolated per team
//! and per organization; only connect/bind failures abort the pass.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::error::SyncError;
use super::policy::{Membership, RemoteUserDirectory};
use super::report::{OrgReport, PassReport};
use crate::domain::directory::{resolve_emails, DirectoryConnector, DirectorySession, EmailSet};
use crate::domain::mapping::{OrgId, OrganizationMapping, TeamSpec};
use crate::domain::team::{RemoteTeamId, TeamDirectory};

/// Settings the engine needs from configuration
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub bind_dn: String,
    pub bind_password: String,
    pub base_dn: String,
    pub email_attribute: String,
    /// Drop emails unknown to the remote organization before updating teams
    pub filter_unknown_users: bool,
}

/// Result of converging one team
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convergence {
    pub team_id: RemoteTeamId,
    pub created: bool,
}

/// Drives directory resolution and remote convergence
pub struct SyncEngine {
    directory: Arc<dyn DirectoryConnector>,
    teams: Arc<dyn TeamDirectory>,
    settings: SyncSettings,
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("directory", &self.directory)
            .field("base_dn", &self.settings.base_dn)
            .field("filter_unknown_users", &self.settings.filter_unknown_users)
            .finish()
    }
}

impl SyncEngine {
    pub fn new(
        directory: Arc<dyn DirectoryConnector>,
        teams: Arc<dyn TeamDirectory>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            directory,
            teams,
            settings,
        }
    }

    /// Run one reconciliation pass over all mappings.
    ///
    /// Returns `Err` only when the directory cannot be reached or bound; every
    /// other failure is recorded in the returned report.
    pub async fn run_pass(&self, mappings: &[OrganizationMapping]) -> Result<PassReport, SyncError> {
        let mut session = self
            .directory
            .connect()
            .await
            .map_err(|reason| SyncError::DirectoryConnectFailed { reason })?;

        if let Err(reason) = session
            .bind(&self.settings.bind_dn, &self.settings.bind_password)
            .await
        {
            session.close().await;
            return Err(SyncError::DirectoryBindFailed { reason });
        }

        let mut report = PassReport::new();
        for mapping in mappings {
            let org_report = self.sync_organization(session.as_mut(), mapping).await;
            report.push(org_report);
        }

        session.close().await;
        report.finish();

        Ok(report)
    }

    async fn sync_organization(
        &self,
        session: &mut dyn DirectorySession,
        mapping: &OrganizationMapping,
    ) -> OrgReport {
        let org_id = mapping.org_id();
        let mut report = OrgReport::new(org_id);

        let known_users = if self.settings.filter_unknown_users {
            match self.teams.list_org_users(org_id).await {
                Ok(users) => {
                    let known = RemoteUserDirectory::from_users(users);
                    debug!(org_id = %org_id, users = known.len(), "Fetched organization users");
                    Some(known)
                }
                Err(reason) => {
                    let err = SyncError::RemoteSnapshotFailed { org_id, reason };
                    error!(org_id = %org_id, error = %err, "Skipping organization");
                    report.record_org_failure(err);
                    return report;
                }
            }
        } else {
            None
        };

        let mut team_ids = HashMap::new();
        for team in mapping.teams() {
            self.sync_team(
                session,
                org_id,
                team,
                known_users.as_ref(),
                &mut team_ids,
                &mut report,
            )
            .await;
        }

        report
    }

    async fn sync_team(
        &self,
        session: &mut dyn DirectorySession,
        org_id: OrgId,
        team: &TeamSpec,
        known_users: Option<&RemoteUserDirectory>,
        team_ids: &mut HashMap<String, RemoteTeamId>,
        report: &mut OrgReport,
    ) {
        let members = self.resolve(session, team.member_filter()).await;
        let admins = self.resolve(session, team.admin_filter()).await;

        let (raw_members, raw_admins) = match (members, admins) {
            (Ok(members), Ok(admins)) => (members, admins),
            (members, admins) => {
                for err in [members.err(), admins.err()].into_iter().flatten() {
                    error!(org_id = %org_id, team = %team.name(), error = %err, "Failed to resolve team filter");
                    report.record_team_failure(team.name(), err);
                }
                return;
            }
        };

        let mut membership = Membership::resolve(raw_members, raw_admins);

        if let Some(known) = known_users {
            let dropped = membership.retain_known(known);
            if !dropped.is_empty() {
                warn!(
                    org_id = %org_id,
                    team = %team.name(),
                    dropped = ?dropped,
                    "Dropping emails unknown to the organization"
                );
                report.record_dropped_unknown(dropped.len());
            }
        }

        info!(
            org_id = %org_id,
            team = %team.name(),
            admins = ?membership.admins(),
            members = ?membership.members(),
            "Resolved team membership"
        );

        let (members, admins) = (membership.members(), membership.admins());
        let result = match team_ids.get(team.name()) {
            Some(&team_id) => self
                .update_members(org_id, team.name(), team_id, members, admins)
                .await
                .map(|()| Convergence {
                    team_id,
                    created: false,
                }),
            None => self.converge_team(org_id, team.name(), members, admins).await,
        };

        match result {
            Ok(convergence) => {
                team_ids.insert(team.name().to_string(), convergence.team_id);
                report.record_converged(team.name(), convergence.created);
            }
            Err(err) => {
                error!(org_id = %org_id, team = %team.name(), error = %err, "Failed to converge team");
                report.record_team_failure(team.name(), err);
            }
        }
    }

    async fn resolve(
        &self,
        session: &mut dyn DirectorySession,
        filter: Option<&str>,
    ) -> Result<EmailSet, SyncError> {
        resolve_emails(session, &self.settings.base_dn, filter, &self.settings.email_attribute)
            .await
            .map_err(|reason| SyncError::DirectoryQueryFailed {
                filter: filter.unwrap_or_default().to_string(),
                reason,
            })
    }

    /// Make the remote team exist and carry exactly these members and admins
    pub async fn converge_team(
        &self,
        org_id: OrgId,
        team: &str,
        members: &[String],
        admins: &[String],
    ) -> Result<Convergence, SyncError> {
        let existing = self
            .teams
            .find_team_by_name(org_id, team)
            .await
            .map_err(|reason| SyncError::RemoteLookupFailed {
                org_id,
                team: team.to_string(),
                reason,
            })?;

        let (team_id, created) = match existing {
            Some(found) => {
                info!(org_id = %org_id, team = %team, team_id = %found.id(), "Team found");
                (found.id(), false)
            }
            None => {
                info!(org_id = %org_id, team = %team, "Team doesn't exist, creating it");
                let id = self.teams.create_team(org_id, team).await.map_err(|reason| {
                    SyncError::RemoteCreateFailed {
                        org_id,
                        team: team.to_string(),
                        reason,
                    }
                })?;
                info!(org_id = %org_id, team = %team, team_id = %id, "Team created");
                (id, true)
            }
        };

        self.update_members(org_id, team, team_id, members, admins)
            .await?;

        Ok(Convergence { team_id, created })
    }

    async fn update_members(
        &self,
        org_id: OrgId,
        team: &str,
        team_id: RemoteTeamId,
        members: &[String],
        admins: &[String],
    ) -> Result<(), SyncError> {
        self.teams
            .replace_members(org_id, team_id, members, admins)
            .await
            .map_err(|reason| SyncError::RemoteUpdateFailed {
                org_id,
                team: team.to_string(),
                team_id,
                reason,
            })?;

        info!(
            org_id = %org_id,
            team = %team,
            team_id = %team_id,
            members = members.len(),
            admins = admins.len(),
            "Team members updated"
        );

        Ok(())
    }
}
