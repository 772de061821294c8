//! Organization mapping entities

use serde::{Deserialize, Serialize};

use super::validation::{
    validate_filters, validate_org_id, validate_team_name, MappingValidationError,
};

/// Grafana organization identifier - always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OrgId(i64);

impl OrgId {
    /// Create a new OrgId after validation
    pub fn new(id: i64) -> Result<Self, MappingValidationError> {
        validate_org_id(id)?;
        Ok(Self(id))
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for OrgId {
    type Error = MappingValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrgId> for i64 {
    fn from(id: OrgId) -> Self {
        id.0
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One Grafana team and the directory filters that populate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSpec {
    name: String,
    admin_filter: Option<String>,
    member_filter: Option<String>,
}

impl TeamSpec {
    /// Create a team spec. Blank filters are treated as absent.
    pub fn new(
        org_id: OrgId,
        name: impl Into<String>,
        admin_filter: Option<String>,
        member_filter: Option<String>,
    ) -> Result<Self, MappingValidationError> {
        let name = name.into();
        let admin_filter = admin_filter.filter(|f| !f.trim().is_empty());
        let member_filter = member_filter.filter(|f| !f.trim().is_empty());

        validate_team_name(org_id.get(), &name)?;
        validate_filters(
            org_id.get(),
            &name,
            admin_filter.as_deref(),
            member_filter.as_deref(),
        )?;

        Ok(Self {
            name,
            admin_filter,
            member_filter,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admin_filter(&self) -> Option<&str> {
        self.admin_filter.as_deref()
    }

    pub fn member_filter(&self) -> Option<&str> {
        self.member_filter.as_deref()
    }
}

/// The teams to reconcile inside one Grafana organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationMapping {
    org_id: OrgId,
    teams: Vec<TeamSpec>,
}

impl OrganizationMapping {
    pub fn new(org_id: OrgId, teams: Vec<TeamSpec>) -> Self {
        Self { org_id, teams }
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    /// Teams in configured order
    pub fn teams(&self) -> &[TeamSpec] {
        &self.teams
    }
}
