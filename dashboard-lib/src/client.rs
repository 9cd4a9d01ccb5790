//! Native HTTP transport using reqwest

use crate::backend::{AuthBackend, RosterSource, SyncBackend};
use crate::roster;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::api::endpoints;
use shared::{
    Agent, AgentDetails, ApiClientConfig, ApiError, AuthErrorBody, LoginRequest, RosterEntry,
    Session, SignupRequest, SyncRequest, SyncResult,
};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn build_client() -> Result<Client, ApiError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ApiError::Server {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// Client for the auth, sync and REST roster endpoints of the backend
pub struct NativeApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl NativeApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client()?,
            config: ApiClientConfig::new(base_url),
        })
    }

    /// Auth endpoints report failures as `{error}` bodies with a non-success
    /// status. Those become `ApiError::Auth` so the text reaches the form.
    async fn authenticate<B: serde::Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<Session, ApiError> {
        let url = self.config.url(endpoint);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Session>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<AuthErrorBody>(&text) {
            Ok(AuthErrorBody {
                error: Some(message),
            }) => Err(ApiError::Auth(message)),
            _ => Err(ApiError::Server {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}

#[async_trait]
impl AuthBackend for NativeApiClient {
    async fn signup(&self, request: SignupRequest) -> Result<Session, ApiError> {
        self.authenticate(endpoints::SIGNUP, &request).await
    }

    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError> {
        self.authenticate(endpoints::LOGIN, &request).await
    }
}

#[async_trait]
impl SyncBackend for NativeApiClient {
    async fn sync(&self, request: SyncRequest) -> Result<SyncResult, ApiError> {
        let url = self.config.url(endpoints::SYNC);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        handle_response(response).await
    }
}

#[async_trait]
impl RosterSource for NativeApiClient {
    async fn fetch_roster(&self, admin_id: &str) -> Result<Vec<Agent>, ApiError> {
        let url = self.config.url(endpoints::AGENTS);
        let response = self
            .client
            .get(&url)
            .query(&[("admin_id", admin_id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let entries: Vec<RosterEntry> = handle_response(response).await?;
        Ok(roster::from_entries(entries))
    }

    async fn fetch_agent_details(
        &self,
        admin_id: &str,
        name: &str,
    ) -> Result<AgentDetails, ApiError> {
        let url = self.config.url_for(&endpoints::agent(name))?;
        let response = self
            .client
            .get(&url)
            .query(&[("admin_id", admin_id)])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        handle_response(response).await
    }
}

/// Roster read straight from a hosted keyed document store
pub struct DocumentRosterClient {
    client: Client,
    config: ApiClientConfig,
}

impl DocumentRosterClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client()?,
            config: ApiClientConfig::new(base_url),
        })
    }

    async fn get_document<T: DeserializeOwned>(
        &self,
        segments: &[String],
    ) -> Result<Option<T>, ApiError> {
        let url = self.config.url_for(segments)?;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        // A missing document reads as null rather than 404 on most stores,
        // but treat 404 the same way for the ones that don't.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        handle_response(response).await
    }
}

#[async_trait]
impl RosterSource for DocumentRosterClient {
    async fn fetch_roster(&self, admin_id: &str) -> Result<Vec<Agent>, ApiError> {
        let document: Option<Map<String, Value>> = self
            .get_document(&endpoints::agents_document(admin_id))
            .await?;
        Ok(roster::from_document(document))
    }

    async fn fetch_agent_details(
        &self,
        admin_id: &str,
        name: &str,
    ) -> Result<AgentDetails, ApiError> {
        let details: Option<AgentDetails> = self
            .get_document(&endpoints::agent_document(admin_id, name))
            .await?;
        Ok(details.unwrap_or_default())
    }
}
