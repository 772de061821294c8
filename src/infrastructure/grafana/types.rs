//! Grafana HTTP API request and response shapes

use serde::{Deserialize, Serialize};

/// `GET /api/teams/search`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSearchResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: i64,
    pub name: String,
}

/// `POST /api/teams`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTeamRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamResponse {
    #[serde(default)]
    pub message: String,
    pub team_id: i64,
}

/// `PUT /api/teams/:id/members`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTeamMembersRequest<'a> {
    pub members: &'a [String],
    pub admins: &'a [String],
}

/// Generic `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// `GET /api/org/users`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUserDto {
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub login: String,
}
