//! Remote team entities

use serde::{Deserialize, Serialize};

use crate::domain::mapping::OrgId;

/// Numeric identifier of a team in the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteTeamId(i64);

impl RemoteTeamId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RemoteTeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A team as it exists in the remote system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTeam {
    id: RemoteTeamId,
    name: String,
    org_id: OrgId,
}

impl RemoteTeam {
    pub fn new(id: RemoteTeamId, name: impl Into<String>, org_id: OrgId) -> Self {
        Self {
            id,
            name: name.into(),
            org_id,
        }
    }

    pub fn id(&self) -> RemoteTeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }
}

/// A user known to a remote organization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgUser {
    pub user_id: i64,
    pub email: String,
    pub login: String,
}

impl OrgUser {
    pub fn new(user_id: i64, email: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            login: login.into(),
        }
    }
}
