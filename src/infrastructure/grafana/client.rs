//! Grafana team API client

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::config::GrafanaConfig;
use super::types::{
    CreateTeamRequest, CreateTeamResponse, MessageResponse, OrgUserDto, TeamSearchResponse,
    UpdateTeamMembersRequest,
};
use crate::domain::mapping::OrgId;
use crate::domain::team::{OrgUser, RemoteTeam, RemoteTeamId, TeamDirectory};
use crate::domain::DomainError;

const SEARCH_TEAMS_PATH: &str = "/api/teams/search";
const TEAMS_PATH: &str = "/api/teams";
const ORG_USERS_PATH: &str = "/api/org/users";
const ORG_ID_HEADER: &str = "X-Grafana-Org-Id";

/// Grafana HTTP API client
#[derive(Debug, Clone)]
pub struct GrafanaClient {
    http: reqwest::Client,
    base_url: String,
    config: GrafanaConfig,
}

impl GrafanaClient {
    pub fn new(config: GrafanaConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DomainError::configuration(format!("failed to build HTTP client: {}", e)))?;
        let base_url = config.url.trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request scoped to an organization and decode the JSON reply
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        org_id: OrgId,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> Result<T, DomainError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        debug!(method = %method, path = %path, org_id = %org_id, "Grafana API request");

        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .header(ORG_ID_HEADER, org_id.get().to_string());

        if !query.is_empty() {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        if let Some((user, password)) = self.config.basic_auth() {
            request = request.basic_auth(user, Some(password));
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::remote(format!("{} {} failed: {}", method, path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(DomainError::remote_status(
                status.as_u16(),
                format!("{} {}: {}", method, path, error_body.trim()),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            DomainError::remote(format!("failed to decode response of {} {}: {}", method, path, e))
        })
    }
}

#[async_trait]
impl TeamDirectory for GrafanaClient {
    async fn find_team_by_name(
        &self,
        org_id: OrgId,
        name: &str,
    ) -> Result<Option<RemoteTeam>, DomainError> {
        let result: TeamSearchResponse = self
            .request(
                Method::GET,
                SEARCH_TEAMS_PATH,
                org_id,
                &[("name", name)],
                None::<&()>,
            )
            .await?;

        debug!(org_id = %org_id, team = %name, total = result.total_count, "Team search result");

        let team = result
            .teams
            .into_iter()
            .find(|t| t.name == name)
            .map(|t| RemoteTeam::new(RemoteTeamId::new(t.id), t.name, org_id));

        Ok(team)
    }

    async fn create_team(&self, org_id: OrgId, name: &str) -> Result<RemoteTeamId, DomainError> {
        let payload = CreateTeamRequest { name, email: None };
        let response: CreateTeamResponse = self
            .request(Method::POST, TEAMS_PATH, org_id, &[], Some(&payload))
            .await?;

        debug!(org_id = %org_id, team = %name, message = %response.message, "Team created");

        Ok(RemoteTeamId::new(response.team_id))
    }

    async fn replace_members(
        &self,
        org_id: OrgId,
        team_id: RemoteTeamId,
        members: &[String],
        admins: &[String],
    ) -> Result<(), DomainError> {
        let payload = UpdateTeamMembersRequest { members, admins };
        let path = format!("{}/{}/members", TEAMS_PATH, team_id);
        let response: MessageResponse = self
            .request(Method::PUT, &path, org_id, &[], Some(&payload))
            .await?;

        debug!(org_id = %org_id, team_id = %team_id, message = %response.message, "Team members replaced");

        Ok(())
    }

    async fn list_org_users(&self, org_id: OrgId) -> Result<Vec<OrgUser>, DomainError> {
        let users: Vec<OrgUserDto> = self
            .request(Method::GET, ORG_USERS_PATH, org_id, &[], None::<&()>)
            .await?;

        Ok(users
            .into_iter()
            .map(|u| OrgUser::new(u.user_id, u.email, u.login))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn org(id: i64) -> OrgId {
        OrgId::new(id).unwrap()
    }

    fn client(server: &MockServer) -> GrafanaClient {
        GrafanaClient::new(GrafanaConfig {
            url: format!("{}/", server.uri()),
            user: "admin".to_string(),
            password: "admin".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_find_team_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/teams/search"))
            .and(query_param("name", "platform"))
            .and(header("X-Grafana-Org-Id", "5"))
            .and(header("authorization", "Basic YWRtaW46YWRtaW4="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalCount": 1,
                "teams": [{
                    "id": 12,
                    "uid": "abc",
                    "orgId": 5,
                    "name": "platform",
                    "email": "",
                    "memberCount": 3
                }],
                "page": 1,
                "perPage": 1000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let team = client(&server)
            .find_team_by_name(org(5), "platform")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(team.id(), RemoteTeamId::new(12));
        assert_eq!(team.name(), "platform");
        assert_eq!(team.org_id(), org(5));
    }

    #[tokio::test]
    async fn test_find_team_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/teams/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"totalCount": 0, "teams": []})),
            )
            .mount(&server)
            .await;

        let team = client(&server).find_team_by_name(org(1), "ghost").await.unwrap();

        assert!(team.is_none());
    }

    #[tokio::test]
    async fn test_find_team_ignores_partial_name_matches() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/teams/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "totalCount": 1,
                "teams": [{"id": 3, "orgId": 1, "name": "platform-admins"}]
            })))
            .mount(&server)
            .await;

        let team = client(&server).find_team_by_name(org(1), "platform").await.unwrap();

        assert!(team.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/teams/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
            .mount(&server)
            .await;

        let err = client(&server)
            .find_team_by_name(org(1), "platform")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("database is locked"));
    }

    #[tokio::test]
    async fn test_create_team() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/teams"))
            .and(header("X-Grafana-Org-Id", "2"))
            .and(body_json(json!({"name": "platform"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Team created",
                "teamId": 31,
                "uid": "def"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = client(&server).create_team(org(2), "platform").await.unwrap();

        assert_eq!(id, RemoteTeamId::new(31));
    }

    #[tokio::test]
    async fn test_create_team_conflict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/teams"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "Team name taken"})),
            )
            .mount(&server)
            .await;

        let err = client(&server).create_team(org(2), "platform").await.unwrap_err();

        assert_eq!(err.status(), Some(409));
    }

    #[tokio::test]
    async fn test_replace_members() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/teams/31/members"))
            .and(header("X-Grafana-Org-Id", "2"))
            .and(body_json(json!({
                "members": ["a@x.com"],
                "admins": ["b@x.com", "c@x.com"]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Team memberships have been updated"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .replace_members(
                org(2),
                RemoteTeamId::new(31),
                &["a@x.com".to_string()],
                &["b@x.com".to_string(), "c@x.com".to_string()],
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_replace_members_sends_empty_lists() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/teams/8/members"))
            .and(body_json(json!({"members": [], "admins": []})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
            .expect(1)
            .mount(&server)
            .await;

        client(&server)
            .replace_members(org(1), RemoteTeamId::new(8), &[], &[])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_org_users() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/org/users"))
            .and(header("X-Grafana-Org-Id", "4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"orgId": 4, "userId": 1, "email": "admin@localhost", "login": "admin", "role": "Admin"},
                {"orgId": 4, "userId": 2, "email": "a@x.com", "login": "a", "role": "Viewer"}
            ])))
            .mount(&server)
            .await;

        let users = client(&server).list_org_users(org(4)).await.unwrap();

        let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        assert_eq!(emails, vec!["admin@localhost", "a@x.com"]);
    }

    #[tokio::test]
    async fn test_undecodable_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/org/users"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let err = client(&server).list_org_users(org(1)).await.unwrap_err();

        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("failed to decode response"));
    }

    #[tokio::test]
    async fn test_no_basic_auth_without_password() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/org/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = GrafanaClient::new(GrafanaConfig {
            url: server.uri(),
            user: "admin".to_string(),
            password: String::new(),
            timeout_secs: 5,
        })
        .unwrap();
        client.list_org_users(org(1)).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }
}
