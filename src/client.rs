//! HTTP client for the tracker service.
//!
//! Covers the snapshot pulls and the command surface. Commands never mutate
//! local state: the service acks them and the resulting change event comes
//! back over the push channel, where the session applies it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use intrack_core::access::AccessGrant;
use intrack_core::event::WireFrame;
use intrack_core::interview::{Interview, InterviewId, InterviewResult, InterviewStatus, UserId};
use intrack_core::invitation::InvitationAction;
use intrack_core::TrackerError;

use crate::config::{Role, TrackerConfig};

/// HTTP client for the tracker service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

// Request/response types matching the server API

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessListing {
    pub granted_by_me: Vec<AccessGrant>,
    pub granted_to_me: Vec<AccessGrant>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInterview {
    pub date: chrono::NaiveDate,
    pub time: chrono::NaiveTime,
    pub counterpart_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize)]
struct StatusRequest {
    status: InterviewStatus,
}

#[derive(Serialize)]
struct ResultRequest {
    result: InterviewResult,
}

#[derive(Serialize)]
struct InvitationRequest {
    action: InvitationAction,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GrantRequest {
    target_id: UserId,
}

/// One long-poll round: the next cursor and any frames that arrived.
#[derive(Debug, Deserialize)]
pub struct PollResponse {
    pub cursor: u64,
    pub frames: Vec<WireFrame>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

impl ApiClient {
    pub fn new(config: &TrackerConfig) -> Self {
        ApiClient {
            http: reqwest::Client::new(),
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path)).bearer_auth(&self.token)
    }

    /// GET /interview-tracker (or /interview-tracker/employer)
    ///
    /// Full snapshot of the user's own schedule. Transport failures surface
    /// as `TrackerError::Fetch`; the caller decides whether to retry.
    pub async fn fetch_schedule(&self, role: Role) -> Result<Vec<Interview>> {
        let path = match role {
            Role::Candidate => "/interview-tracker",
            Role::Employer => "/interview-tracker/employer",
        };
        self.fetch_snapshot(path).await
    }

    /// GET /interview-tracker/access/{userId}/calendar
    pub async fn fetch_delegated_calendar(&self, user_id: UserId) -> Result<Vec<Interview>> {
        self.fetch_snapshot(&format!("/interview-tracker/access/{user_id}/calendar"))
            .await
    }

    async fn fetch_snapshot(&self, path: &str) -> Result<Vec<Interview>> {
        let resp = self
            .get(path)
            .send()
            .await
            .map_err(|e| TrackerError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let msg = read_error(resp).await;
            return Err(TrackerError::Fetch(format!("{status}: {msg}")).into());
        }

        resp.json()
            .await
            .map_err(|e| TrackerError::Fetch(e.to_string()).into())
    }

    /// GET /interview-tracker/access
    pub async fn fetch_access(&self) -> Result<AccessListing> {
        let resp = self
            .get("/interview-tracker/access")
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, None).await
    }

    /// POST /interview-tracker
    pub async fn create_interview(&self, interview: &NewInterview) -> Result<Interview> {
        let resp = self
            .http
            .post(self.url("/interview-tracker"))
            .bearer_auth(&self.token)
            .json(interview)
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, None).await
    }

    /// PUT /interview-tracker/{id}
    pub async fn update_interview(
        &self,
        id: InterviewId,
        interview: &NewInterview,
    ) -> Result<Interview> {
        let resp = self
            .http
            .put(self.url(&format!("/interview-tracker/{id}")))
            .bearer_auth(&self.token)
            .json(interview)
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, Some(id)).await
    }

    /// PATCH /interview-tracker/{id}/status
    pub async fn update_status(&self, id: InterviewId, status: InterviewStatus) -> Result<Interview> {
        let resp = self
            .http
            .patch(self.url(&format!("/interview-tracker/{id}/status")))
            .bearer_auth(&self.token)
            .json(&StatusRequest { status })
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, Some(id)).await
    }

    /// PATCH /interview-tracker/{id}/result
    pub async fn update_result(&self, id: InterviewId, result: InterviewResult) -> Result<Interview> {
        let resp = self
            .http
            .patch(self.url(&format!("/interview-tracker/{id}/result")))
            .bearer_auth(&self.token)
            .json(&ResultRequest { result })
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, Some(id)).await
    }

    /// DELETE /interview-tracker/{id}
    pub async fn delete_interview(&self, id: InterviewId) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/interview-tracker/{id}")))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        check(resp, Some(id)).await
    }

    /// PATCH /interview-tracker/{id}/invitation
    pub async fn respond_invitation(
        &self,
        id: InterviewId,
        action: InvitationAction,
    ) -> Result<Interview> {
        let resp = self
            .http
            .patch(self.url(&format!("/interview-tracker/{id}/invitation")))
            .bearer_auth(&self.token)
            .json(&InvitationRequest { action })
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, Some(id)).await
    }

    /// POST /interview-tracker/access
    pub async fn grant_access(&self, target_id: UserId) -> Result<AccessGrant> {
        let resp = self
            .http
            .post(self.url("/interview-tracker/access"))
            .bearer_auth(&self.token)
            .json(&GrantRequest { target_id })
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, Some(target_id)).await
    }

    /// DELETE /interview-tracker/access/{id}
    pub async fn revoke_access(&self, grant_id: i64) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/interview-tracker/access/{grant_id}")))
            .bearer_auth(&self.token)
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        check(resp, Some(grant_id)).await
    }

    /// GET /interview-tracker/events?cursor=N
    ///
    /// One long-poll round against the push channel. The server parks the
    /// request until frames are available or its poll window lapses.
    pub async fn poll_events(&self, cursor: u64) -> Result<PollResponse> {
        let resp = self
            .get(&format!("/interview-tracker/events?cursor={cursor}"))
            .send()
            .await
            .context("Failed to reach the tracker service")?;
        decode(resp, None).await
    }
}

/// Decode a JSON response body, mapping error statuses into the tracker
/// error taxonomy.
async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    entity_id: Option<i64>,
) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }
    Err(map_error(status, read_error(resp).await, entity_id))
}

/// Like `decode`, for endpoints with empty success bodies.
async fn check(resp: reqwest::Response, entity_id: Option<i64>) -> Result<()> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    Err(map_error(status, read_error(resp).await, entity_id))
}

fn map_error(status: reqwest::StatusCode, msg: String, entity_id: Option<i64>) -> anyhow::Error {
    use reqwest::StatusCode;

    match status {
        StatusCode::NOT_FOUND => TrackerError::NotFound(entity_id.unwrap_or_default()).into(),
        StatusCode::CONFLICT => TrackerError::DuplicateGrant(entity_id.unwrap_or_default()).into(),
        StatusCode::FORBIDDEN => TrackerError::NotGrantor(entity_id.unwrap_or_default()).into(),
        StatusCode::UNPROCESSABLE_ENTITY => TrackerError::InvalidTarget(msg).into(),
        _ => anyhow::anyhow!("{}: {}", status, msg),
    }
}

async fn read_error(resp: reqwest::Response) -> String {
    match resp.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => "no error details".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_url: &str) -> TrackerConfig {
        TrackerConfig {
            server_url: server_url.to_string(),
            token: "test-token".to_string(),
            user_id: 7,
            role: Role::Candidate,
        }
    }

    #[tokio::test]
    async fn test_fetch_schedule_decodes_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/interview-tracker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": 1,
                    "ownerUserId": 7,
                    "date": "2024-03-05",
                    "time": "10:00:00",
                    "counterpartName": "Acme",
                    "status": "scheduled",
                }
            ])))
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let schedule = client.fetch_schedule(Role::Candidate).await.unwrap();

        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].id, 1);
        assert_eq!(schedule[0].owner_user_id, 7);
    }

    #[tokio::test]
    async fn test_fetch_failure_surfaces_as_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/interview-tracker"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "boom"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let err = client.fetch_schedule(Role::Candidate).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Fetch(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_interview_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/interview-tracker/42"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(serde_json::json!({"error": "gone"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&test_config(&server.uri()));
        let err = client.delete_interview(42).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::NotFound(42))
        ));
    }
}
