//! API client types and endpoint definitions
//!
//! Shared by the native (reqwest) transport and the fakes used in tests.

use serde::{Deserialize, Serialize};
use url::Url;

/// API error types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ApiError {
    /// Network or connection error
    Network(String),
    /// Server returned an error status
    Server { status: u16, message: String },
    /// Failed to parse response
    Parse(String),
    /// Authentication rejected by the backend
    Auth(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Server { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Auth(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// API endpoint definitions
pub mod endpoints {
    pub const SIGNUP: &str = "/signup";
    pub const LOGIN: &str = "/login";
    pub const SYNC: &str = "/sync";
    pub const AGENTS: &str = "/agents";

    // Paths that carry user-supplied names are returned as raw segments and
    // encoded by `ApiClientConfig::url_for`.

    /// REST detail record for one agent (admin_id goes in the query)
    pub fn agent(name: &str) -> Vec<String> {
        vec!["agents".to_string(), name.to_string()]
    }

    /// Keyed roster document (`{name: bool}`) in a hosted document store
    pub fn agents_document(admin_id: &str) -> Vec<String> {
        vec!["agents".to_string(), format!("{}.json", admin_id)]
    }

    /// Keyed detail document for one agent in a hosted document store
    pub fn agent_document(admin_id: &str, name: &str) -> Vec<String> {
        vec![
            "agents".to_string(),
            admin_id.to_string(),
            format!("{}.json", name),
        ]
    }
}

/// Configuration for creating an API client
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClientConfig {
    /// Base URL of the server (e.g., "http://localhost:3000")
    pub base_url: String,
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Append path segments to the base URL, percent-encoding each one
    pub fn url_for(&self, segments: &[String]) -> Result<String, ApiError> {
        let invalid = || ApiError::Network(format!("Invalid base URL: {}", self.base_url));

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }
}
