//! HTTP client for the remote task API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{ApiError, ConfigError};
use crate::session::Session;
use crate::task::{Task, TaskId, TaskPayload};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub firstname: String,
    pub lastname: String,
}

#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError>;
    async fn create_task(&self, task: &TaskPayload) -> Result<(), ApiError>;
    async fn update_task(&self, id: TaskId, task: &TaskPayload) -> Result<(), ApiError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;
}

/// Extract a human-readable message from an error body.
///
/// Uses the JSON `message` field when there is one, the raw body otherwise.
fn extract_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        match json.get("message") {
            Some(serde_json::Value::String(msg)) => return msg.clone(),
            Some(serde_json::Value::Array(msgs)) => {
                let joined: Vec<&str> = msgs.iter().filter_map(|m| m.as_str()).collect();
                if !joined.is_empty() {
                    return joined.join("; ");
                }
            }
            _ => {}
        }
    }
    body.to_string()
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

impl ApiClient {
    pub fn new(config: &Config, session: Session) -> Result<Self, ConfigError> {
        let base_url = config.base_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Map a non-success response to an `ApiError` based on status code.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        warn!(status = status_code, "API request failed: {}", message);

        match status_code {
            401 => Err(ApiError::Unauthorized(message)),
            404 => Err(ApiError::NotFound(message)),
            _ => Err(ApiError::Api {
                status: status_code,
                body: message,
            }),
        }
    }
}

#[async_trait]
impl TaskApi for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        debug!("GET /tasks");
        let response = self.authorized(self.client.get(self.url("/tasks"))).send().await?;
        let response = self.check_response(response).await?;
        let tasks = response.json().await?;
        Ok(tasks)
    }

    async fn create_task(&self, task: &TaskPayload) -> Result<(), ApiError> {
        debug!(name = %task.name, "POST /tasks");
        let request = self.client.post(self.url("/tasks")).json(task);
        let response = self.authorized(request).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn update_task(&self, id: TaskId, task: &TaskPayload) -> Result<(), ApiError> {
        debug!("PATCH /tasks/{}", id);
        let request = self.client.patch(self.url(&format!("/tasks/{}", id))).json(task);
        let response = self.authorized(request).send().await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        debug!("DELETE /tasks/{}", id);
        let request = self.client.delete(self.url(&format!("/tasks/{}", id)));
        let response = self.authorized(request).send().await?;
        self.check_response(response).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        debug!(email = %request.email, "POST /auth/login");
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;
        let response = self.check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        debug!(email = %request.email, "POST /auth/register");
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;
        self.check_response(response).await?;
        Ok(())
    }
}
