//! The UI shell's entry point into the core: auth forms, navigation,
//! theme, and the lifecycle of the running dashboard.

use crate::backend::AuthBackend;
use crate::config::PollSettings;
use crate::controller::{DashboardBackends, DashboardController, DashboardSnapshot};
use crate::error::{DashboardError, ValidationError};
use crate::router::{AuthScreen, RouteEvent, Screen, ViewRouter, ViewState};
use crate::session_store::{SessionStore, ThemeStore};
use crate::storage::KeyValueStorage;
use shared::{AgentDetails, ApiError, LoginRequest, Session, SignupRequest, ThemePreference};
use std::sync::Arc;
use tracing::{info, warn};

pub struct App {
    router: ViewRouter,
    themes: ThemeStore,
    theme: ThemePreference,
    auth: Arc<dyn AuthBackend>,
    backends: DashboardBackends,
    settings: PollSettings,
    dashboard: Option<DashboardController>,
    auth_status: String,
}

impl App {
    /// Restore persisted state and open the initial screen. If a session was
    /// saved, the dashboard starts right away, so this must run inside a
    /// tokio runtime.
    pub fn start(
        storage: Arc<dyn KeyValueStorage>,
        auth: Arc<dyn AuthBackend>,
        backends: DashboardBackends,
        settings: PollSettings,
    ) -> Self {
        let router = ViewRouter::start(SessionStore::new(storage.clone()));
        let themes = ThemeStore::new(storage);
        let theme = themes.load();

        let mut app = Self {
            router,
            themes,
            theme,
            auth,
            backends,
            settings,
            dashboard: None,
            auth_status: String::new(),
        };
        app.sync_dashboard();
        app
    }

    pub fn view(&self) -> &ViewState {
        self.router.state()
    }

    pub fn session(&self) -> Option<&Session> {
        self.router.state().session()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    /// Inline status text for the signup/login form
    pub fn auth_status(&self) -> &str {
        &self.auth_status
    }

    /// The running dashboard, if the dashboard screen is showing
    pub fn dashboard(&self) -> Option<&DashboardController> {
        self.dashboard.as_ref()
    }

    pub fn dashboard_snapshot(&self) -> Option<DashboardSnapshot> {
        self.dashboard.as_ref().map(DashboardController::snapshot)
    }

    pub async fn signup(
        &mut self,
        email: &str,
        password: &str,
        admin_id: &str,
    ) -> Result<&ViewState, DashboardError> {
        self.require_screen(AuthScreen::SignUp, "sign up")?;

        let request = match signup_request(email, password, admin_id) {
            Ok(request) => request,
            Err(e) => {
                self.auth_status = format!("Error: {}", e);
                return Err(e.into());
            }
        };

        self.auth_status = "Creating account...".to_string();
        match self.auth.signup(request).await {
            Ok(session) => {
                self.auth_status = "Signup successful!".to_string();
                info!(email = %session.email, "Signed up");
                self.navigate(RouteEvent::SignupSucceeded(session))
            }
            Err(e) => {
                self.auth_status = format!("Error: {}", auth_failure_text(&e, "Signup failed"));
                warn!(error = %e, "Signup failed");
                Err(e.into())
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&ViewState, DashboardError> {
        self.require_screen(AuthScreen::Login, "log in")?;

        let request = match login_request(email, password) {
            Ok(request) => request,
            Err(e) => {
                self.auth_status = e.to_string();
                return Err(e.into());
            }
        };

        self.auth_status = "Logging in...".to_string();
        match self.auth.login(request).await {
            Ok(session) => {
                self.auth_status = "Success!".to_string();
                info!(email = %session.email, "Logged in");
                self.navigate(RouteEvent::LoginSucceeded(session))
            }
            Err(e) => {
                self.auth_status = auth_failure_text(&e, "Login failed");
                warn!(error = %e, "Login failed");
                Err(e.into())
            }
        }
    }

    pub fn go_to_login(&mut self) -> Result<&ViewState, DashboardError> {
        self.auth_status.clear();
        self.navigate(RouteEvent::ShowLogin)
    }

    pub fn go_to_signup(&mut self) -> Result<&ViewState, DashboardError> {
        self.auth_status.clear();
        self.navigate(RouteEvent::ShowSignup)
    }

    pub fn select_agent(&mut self, name: &str) -> Result<&ViewState, DashboardError> {
        self.navigate(RouteEvent::SelectAgent(name.to_string()))
    }

    pub fn back(&mut self) -> Result<&ViewState, DashboardError> {
        self.navigate(RouteEvent::Back)
    }

    pub fn logout(&mut self) -> Result<&ViewState, DashboardError> {
        self.navigate(RouteEvent::Logout)
    }

    pub fn toggle_theme(&mut self) -> Result<ThemePreference, DashboardError> {
        self.theme = self.themes.toggle()?;
        Ok(self.theme)
    }

    /// Details for the agent on the detail screen. Failures are logged and
    /// shown as an empty record.
    pub async fn agent_details(&self) -> Result<AgentDetails, DashboardError> {
        let ViewState::SignedIn {
            session,
            screen: Screen::AgentDetail(name),
        } = self.router.state()
        else {
            return Err(DashboardError::NotAuthenticated);
        };

        match self
            .backends
            .roster
            .fetch_agent_details(&session.admin_id, name)
            .await
        {
            Ok(details) => Ok(details),
            Err(e) => {
                warn!(agent = %name, error = %e, "Agent details fetch failed");
                Ok(AgentDetails::default())
            }
        }
    }

    fn require_screen(&self, screen: AuthScreen, action: &str) -> Result<(), DashboardError> {
        match self.router.state() {
            ViewState::SignedOut(current) if *current == screen => Ok(()),
            other => Err(DashboardError::IllegalTransition {
                from: other.name(),
                event: action.to_string(),
            }),
        }
    }

    fn navigate(&mut self, event: RouteEvent) -> Result<&ViewState, DashboardError> {
        self.router.dispatch(event)?;
        self.sync_dashboard();
        Ok(self.router.state())
    }

    /// Keep exactly one controller alive while the dashboard screen shows,
    /// and none otherwise
    fn sync_dashboard(&mut self) {
        let admin_id = match self.router.state() {
            ViewState::SignedIn {
                session,
                screen: Screen::Dashboard,
            } => Some(session.admin_id.clone()),
            _ => None,
        };

        match (admin_id, self.dashboard.is_some()) {
            (Some(admin_id), false) => {
                self.dashboard = Some(DashboardController::start(
                    admin_id,
                    self.settings.clone(),
                    self.backends.clone(),
                ));
            }
            (None, true) => {
                if let Some(mut dashboard) = self.dashboard.take() {
                    dashboard.stop();
                }
            }
            _ => {}
        }
    }
}

fn signup_request(
    email: &str,
    password: &str,
    admin_id: &str,
) -> Result<SignupRequest, ValidationError> {
    Ok(SignupRequest {
        email: required(email, ValidationError::MissingEmail)?.trim().to_string(),
        password: required(password, ValidationError::MissingPassword)?.to_string(),
        admin_id: required(admin_id, ValidationError::MissingAdminId)?
            .trim()
            .to_string(),
    })
}

fn login_request(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    Ok(LoginRequest {
        email: required(email, ValidationError::MissingEmail)?.trim().to_string(),
        password: required(password, ValidationError::MissingPassword)?.to_string(),
    })
}

/// Blank-only input counts as missing. The value itself is returned as
/// typed; passwords are sent verbatim.
fn required(value: &str, missing: ValidationError) -> Result<&str, ValidationError> {
    if value.trim().is_empty() {
        Err(missing)
    } else {
        Ok(value)
    }
}

/// Text shown under the form when the backend rejects the request
fn auth_failure_text(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Auth(message) if !message.is_empty() => message.clone(),
        ApiError::Auth(_) | ApiError::Server { .. } => fallback.to_string(),
        other => other.to_string(),
    }
}
