//! Error types for dashboard-lib

use shared::ApiError;

/// A required form field was left empty. Checked before any network call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Password is required")]
    MissingPassword,

    #[error("Admin ID is required")]
    MissingAdminId,
}

/// Errors surfaced by the dashboard core
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("{0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    Parse(String),

    #[error("{0}")]
    Auth(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Cannot {event} from {from}")]
    IllegalTransition { from: String, event: String },

    #[error("No active session")]
    NotAuthenticated,
}

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Network(msg) => DashboardError::Network(msg),
            ApiError::Server { .. } => DashboardError::Network(err.to_string()),
            ApiError::Parse(msg) => DashboardError::Parse(msg),
            ApiError::Auth(msg) => DashboardError::Auth(msg),
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::from(ValidationError::MissingAdminId);
        assert_eq!(format!("{}", err), "Admin ID is required");

        let err = DashboardError::IllegalTransition {
            from: "Login".to_string(),
            event: "logout".to_string(),
        };
        assert_eq!(format!("{}", err), "Cannot logout from Login");

        let err = DashboardError::NotAuthenticated;
        assert_eq!(format!("{}", err), "No active session");
    }

    #[test]
    fn test_server_error_maps_to_network() {
        let err = DashboardError::from(ApiError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(matches!(err, DashboardError::Network(_)));
        assert_eq!(format!("{}", err), "Server error (500): boom");
    }
}
