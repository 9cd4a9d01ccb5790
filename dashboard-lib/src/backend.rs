//! Seams to the external collaborators: auth backend, sync backend and
//! roster source.
//!
//! Implemented by the native reqwest transport in [`crate::client`] and by
//! scripted fakes in tests.

use async_trait::async_trait;
use shared::{
    Agent, AgentDetails, ApiError, LoginRequest, Session, SignupRequest, SyncRequest, SyncResult,
};

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Create an account. `ApiError::Auth` carries the backend's error text.
    async fn signup(&self, request: SignupRequest) -> Result<Session, ApiError>;

    /// Log in to an existing account
    async fn login(&self, request: LoginRequest) -> Result<Session, ApiError>;
}

#[async_trait]
pub trait SyncBackend: Send + Sync {
    /// Run one sync. Non-success responses are errors.
    async fn sync(&self, request: SyncRequest) -> Result<SyncResult, ApiError>;
}

#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Current roster for an admin, already normalized. An empty vec means
    /// the source explicitly reported no agents.
    async fn fetch_roster(&self, admin_id: &str) -> Result<Vec<Agent>, ApiError>;

    async fn fetch_agent_details(
        &self,
        admin_id: &str,
        name: &str,
    ) -> Result<AgentDetails, ApiError>;
}
