use serde::{Deserialize, Serialize};

// API client types and endpoint paths
pub mod api;
pub use api::{ApiClientConfig, ApiError};

// ============================================================================
// Authentication
// ============================================================================

/// Authenticated identity returned by /login and /signup.
///
/// Only `email` and `admin_id` are interpreted. Everything else the backend
/// sends is kept in `extra` and written back out unchanged when the session is
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub email: String,
    pub admin_id: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    pub fn new(email: impl Into<String>, admin_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            admin_id: admin_id.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Body for POST /signup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub admin_id: String,
}

/// Body for POST /login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Error body returned by the auth backend with a non-success status
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// Sync
// ============================================================================

/// How many rows the backend writes per sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Write every row
    #[default]
    All,
    /// Write only the latest row
    Single,
}

impl SyncMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Single => "single",
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "single" => Ok(Self::Single),
            other => Err(format!("unknown sync mode: {}", other)),
        }
    }
}

/// Body for POST /sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub admin_id: String,
    pub mode: SyncMode,
}

/// Raw response of one sync attempt.
///
/// The backend may return any JSON object; `written_count` is the only field
/// the dashboard derives anything from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncResult {
    pub raw: serde_json::Value,
}

impl SyncResult {
    pub fn new(raw: serde_json::Value) -> Self {
        Self { raw }
    }

    /// `written_count` if the response carries an integer under that key
    pub fn written_count(&self) -> Option<i64> {
        self.raw.get("written_count").and_then(|v| v.as_i64())
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }
}

// ============================================================================
// Roster
// ============================================================================

/// One row of GET /agents?admin_id=...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub agent_id: String,
    #[serde(default)]
    pub status: serde_json::Value,
}

/// Display-ready roster row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    pub active: bool,
}

impl Agent {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
        }
    }
}

/// Per-agent statistics shown on the detail view.
///
/// Every field is optional; the source document may omit any of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDetails {
    #[serde(default)]
    pub answered: Option<serde_json::Value>,
    #[serde(default)]
    pub login_time: Option<serde_json::Value>,
    #[serde(default)]
    pub logout_time: Option<serde_json::Value>,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    #[serde(default)]
    pub total_calls: Option<serde_json::Value>,
    #[serde(default)]
    pub total_calltime: Option<serde_json::Value>,
}

impl AgentDetails {
    /// Label/value pairs in display order, `-` for missing values
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        fn show(value: &Option<serde_json::Value>) -> String {
            match value {
                None | Some(serde_json::Value::Null) => "-".to_string(),
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            }
        }

        vec![
            ("Answered", show(&self.answered)),
            ("Login Time", show(&self.login_time)),
            ("Logout Time", show(&self.logout_time)),
            ("Rating", show(&self.rating)),
            ("Total Calls", show(&self.total_calls)),
            ("Total Call Time", show(&self.total_calltime)),
        ]
    }
}

// ============================================================================
// Preferences
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Persisted UI theme, independent of the login session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference {
    pub mode: ThemeMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keeps_passthrough_fields() {
        let json = r#"{"email":"a@b.c","admin_id":"adm-1","token":"xyz","plan":{"tier":2}}"#;
        let session: Session = serde_json::from_str(json).unwrap();

        assert_eq!(session.email, "a@b.c");
        assert_eq!(session.admin_id, "adm-1");
        assert_eq!(session.extra["token"], "xyz");

        let back = serde_json::to_value(&session).unwrap();
        assert_eq!(back["plan"]["tier"], 2);
    }

    #[test]
    fn test_sync_request_wire_format() {
        let req = SyncRequest {
            admin_id: "adm-1".to_string(),
            mode: SyncMode::All,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"admin_id": "adm-1", "mode": "all"}));
    }

    #[test]
    fn test_sync_mode_parses_case_insensitively() {
        assert_eq!("Single".parse::<SyncMode>().unwrap(), SyncMode::Single);
        assert_eq!(" all ".parse::<SyncMode>().unwrap(), SyncMode::All);
        assert!("latest".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_written_count_is_optional() {
        let with = SyncResult::new(serde_json::json!({"written_count": 7, "ok": true}));
        let without = SyncResult::new(serde_json::json!({"ok": true}));
        let wrong_type = SyncResult::new(serde_json::json!({"written_count": "7"}));

        assert_eq!(with.written_count(), Some(7));
        assert_eq!(without.written_count(), None);
        assert_eq!(wrong_type.written_count(), None);
    }

    #[test]
    fn test_agent_details_rows_fill_missing_with_dash() {
        let details: AgentDetails =
            serde_json::from_str(r#"{"answered": 12, "rating": "4.5", "login_time": null}"#)
                .unwrap();
        let rows = details.rows();

        assert_eq!(rows[0], ("Answered", "12".to_string()));
        assert_eq!(rows[1], ("Login Time", "-".to_string()));
        assert_eq!(rows[3], ("Rating", "4.5".to_string()));
        assert_eq!(rows[5], ("Total Call Time", "-".to_string()));
    }

    #[test]
    fn test_theme_preference_wire_format() {
        let pref = ThemePreference {
            mode: ThemeMode::Dark,
        };
        assert_eq!(serde_json::to_string(&pref).unwrap(), r#"{"mode":"dark"}"#);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }
}
