//! Mapping validation

use thiserror::Error;

/// Errors that can occur while validating an organization mapping
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MappingValidationError {
    #[error("org_id must be a positive integer, got {0}")]
    InvalidOrgId(i64),

    #[error("org_id {0} is mapped more than once")]
    DuplicateOrgId(i64),

    #[error("team name cannot be empty in orgId {0}")]
    EmptyTeamName(i64),

    #[error("team name cannot exceed {0} characters")]
    TeamNameTooLong(usize),

    #[error(
        "one of admin_user_filter or member_user_filter must be specified for team {team} in orgId {org_id}"
    )]
    MissingFilter { team: String, org_id: i64 },
}

const MAX_TEAM_NAME_LENGTH: usize = 190;

/// Validate a Grafana organization ID
pub fn validate_org_id(id: i64) -> Result<(), MappingValidationError> {
    if id <= 0 {
        return Err(MappingValidationError::InvalidOrgId(id));
    }

    Ok(())
}

/// Validate a team name
pub fn validate_team_name(org_id: i64, name: &str) -> Result<(), MappingValidationError> {
    if name.trim().is_empty() {
        return Err(MappingValidationError::EmptyTeamName(org_id));
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(MappingValidationError::TeamNameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// A team must carry at least one directory filter
pub fn validate_filters(
    org_id: i64,
    team: &str,
    admin_filter: Option<&str>,
    member_filter: Option<&str>,
) -> Result<(), MappingValidationError> {
    let present = |f: Option<&str>| f.is_some_and(|f| !f.trim().is_empty());

    if !present(admin_filter) && !present(member_filter) {
        return Err(MappingValidationError::MissingFilter {
            team: team.to_string(),
            org_id,
        });
    }

    Ok(())
}
