//! Runtime configuration for the dashboard core

use crate::backend::{AuthBackend, RosterSource, SyncBackend};
use crate::client::{DocumentRosterClient, NativeApiClient};
use crate::controller::DashboardBackends;
use crate::error::DashboardError;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::scheduler::MIN_PERIOD;
use shared::SyncMode;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";
pub const ENV_BACKEND_URL: &str = "DASHBOARD_BACKEND_URL";
pub const ENV_ROSTER_URL: &str = "DASHBOARD_ROSTER_URL";

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_SYNC_EVERY_TICKS: u32 = 10;

/// Cadence and sizing of a running dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    /// One time-unit; the countdown moves once per tick
    pub tick: Duration,
    /// Sync and roster cadence, in ticks
    pub sync_every_ticks: u32,
    pub history_capacity: usize,
    pub sync_mode: SyncMode,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            sync_every_ticks: DEFAULT_SYNC_EVERY_TICKS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            sync_mode: SyncMode::All,
        }
    }
}

impl PollSettings {
    /// The configured tick, raised to the scheduler's minimum period
    pub fn tick_period(&self) -> Duration {
        self.tick.max(MIN_PERIOD)
    }

    pub fn sync_period(&self) -> Duration {
        self.tick_period() * self.sync_every_ticks.max(1)
    }
}

/// Where the roster comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterSourceConfig {
    /// `GET {backend_url}/agents?admin_id=...`
    Rest,
    /// Keyed document at `{base_url}/agents/{admin_id}.json`
    Document { base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub roster: RosterSourceConfig,
    pub poll: PollSettings,
    /// Directory for persisted session/theme; platform config dir when unset
    pub storage_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            roster: RosterSourceConfig::Rest,
            poll: PollSettings::default(),
            storage_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Validate URLs and build the network clients
    pub fn connect(&self) -> Result<(Arc<dyn AuthBackend>, DashboardBackends), DashboardError> {
        let backend_url = normalize_base_url(&self.backend_url)?;
        let api = Arc::new(NativeApiClient::new(&backend_url)?);

        let roster: Arc<dyn RosterSource> = match &self.roster {
            RosterSourceConfig::Rest => api.clone(),
            RosterSourceConfig::Document { base_url } => {
                Arc::new(DocumentRosterClient::new(&normalize_base_url(base_url)?)?)
            }
        };

        let sync: Arc<dyn SyncBackend> = api.clone();
        let auth: Arc<dyn AuthBackend> = api;
        Ok((auth, DashboardBackends { sync, roster }))
    }
}

/// Trim whitespace and trailing slashes; require an http(s) scheme and host
pub fn normalize_base_url(raw: &str) -> Result<String, DashboardError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(DashboardError::Config("base url must not be empty".to_string()));
    }
    let Some((scheme, remainder)) = trimmed.split_once("://") else {
        return Err(invalid_url(raw));
    };
    if !matches!(scheme, "http" | "https") || remainder.is_empty() || remainder.starts_with('/')
    {
        return Err(invalid_url(raw));
    }
    Ok(trimmed.to_string())
}

fn invalid_url(raw: &str) -> DashboardError {
    DashboardError::Config(format!(
        "base url must use http:// or https:// and include a host: {}",
        raw
    ))
}
