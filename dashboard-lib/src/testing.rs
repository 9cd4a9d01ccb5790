//! Scripted backends for unit tests.
//!
//! Each fake pops queued responses in call order and falls back to a benign
//! default once the queue is empty. `hold()` makes every call started after
//! it wait until the returned `Notify` is triggered; `hold_next()` holds only
//! the next call, so calls can be made to resolve out of order.

use crate::backend::{AuthBackend, RosterSource, SyncBackend};
use async_trait::async_trait;
use shared::{
    Agent, AgentDetails, ApiError, LoginRequest, Session, SignupRequest, SyncRequest, SyncResult,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct Gate {
    all: Mutex<Option<Arc<Notify>>>,
    next: Mutex<VecDeque<Arc<Notify>>>,
}

impl Gate {
    fn hold(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.all.lock().unwrap() = Some(notify.clone());
        notify
    }

    fn hold_next(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.next.lock().unwrap().push_back(notify.clone());
        notify
    }

    /// Pick the gate for a call as it starts
    fn take(&self) -> Option<Arc<Notify>> {
        let next = self.next.lock().unwrap().pop_front();
        next.or_else(|| self.all.lock().unwrap().clone())
    }
}

async fn pass(gate: Option<Arc<Notify>>) {
    if let Some(gate) = gate {
        gate.notified().await;
    }
}

#[derive(Default)]
pub struct FakeSync {
    responses: Mutex<VecDeque<Result<SyncResult, ApiError>>>,
    requests: Mutex<Vec<SyncRequest>>,
    gate: Gate,
}

impl FakeSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, raw: serde_json::Value) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(SyncResult::new(raw)));
    }

    pub fn push_err(&self, err: ApiError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn hold(&self) -> Arc<Notify> {
        self.gate.hold()
    }

    pub fn hold_next(&self) -> Arc<Notify> {
        self.gate.hold_next()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<SyncRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl SyncBackend for FakeSync {
    async fn sync(&self, request: SyncRequest) -> Result<SyncResult, ApiError> {
        self.requests.lock().unwrap().push(request);
        let gate = self.gate.take();
        let next = self.responses.lock().unwrap().pop_front();
        pass(gate).await;
        next.unwrap_or_else(|| Ok(SyncResult::new(serde_json::json!({"status": "ok"}))))
    }
}

#[derive(Default)]
pub struct FakeRoster {
    responses: Mutex<VecDeque<Result<Vec<Agent>, ApiError>>>,
    details: Mutex<Option<Result<AgentDetails, ApiError>>>,
    calls: Mutex<usize>,
    gate: Gate,
}

impl FakeRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, agents: Vec<Agent>) {
        self.responses.lock().unwrap().push_back(Ok(agents));
    }

    pub fn push_err(&self, err: ApiError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn set_details(&self, details: Result<AgentDetails, ApiError>) {
        *self.details.lock().unwrap() = Some(details);
    }

    pub fn hold(&self) -> Arc<Notify> {
        self.gate.hold()
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RosterSource for FakeRoster {
    async fn fetch_roster(&self, _admin_id: &str) -> Result<Vec<Agent>, ApiError> {
        *self.calls.lock().unwrap() += 1;
        let gate = self.gate.take();
        let next = self.responses.lock().unwrap().pop_front();
        pass(gate).await;
        next.unwrap_or_else(|| Err(ApiError::Network("no scripted roster".to_string())))
    }

    async fn fetch_agent_details(
        &self,
        _admin_id: &str,
        _name: &str,
    ) -> Result<AgentDetails, ApiError> {
        let details = self.details.lock().unwrap().clone();
        details.unwrap_or_else(|| Ok(AgentDetails::default()))
    }
}

#[derive(Default)]
pub struct FakeAuth {
    signup: Mutex<Option<Result<Session, ApiError>>>,
    login: Mutex<Option<Result<Session, ApiError>>>,
    calls: Mutex<usize>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_signup(&self, result: Result<Session, ApiError>) {
        *self.signup.lock().unwrap() = Some(result);
    }

    pub fn on_login(&self, result: Result<Session, ApiError>) {
        *self.login.lock().unwrap() = Some(result);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn signup(&self, request: SignupRequest) -> Result<Session, ApiError> {
        *self.calls.lock().unwrap() += 1;
        let scripted = self.signup.lock().unwrap().clone();
        scripted.unwrap_or_else(|| Ok(Session::new(request.email, request.admin_id)))
    }

    async fn login(&self, _request: LoginRequest) -> Result<Session, ApiError> {
        *self.calls.lock().unwrap() += 1;
        let scripted = self.login.lock().unwrap().clone();
        scripted.unwrap_or_else(|| Err(ApiError::Auth("Invalid credentials".to_string())))
    }
}
