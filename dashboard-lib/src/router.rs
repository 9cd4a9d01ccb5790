//! Which screen is showing, gated by authentication.
//!
//! The signed-in states carry the [`Session`] itself, so an authenticated
//! screen cannot exist without one. The router is also the only caller of
//! [`SessionStore::save`] and [`SessionStore::clear`].

use crate::error::DashboardError;
use crate::session_store::SessionStore;
use shared::Session;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    SignUp,
    Login,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    AgentDetail(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    SignedOut(AuthScreen),
    SignedIn { session: Session, screen: Screen },
}

impl ViewState {
    pub fn name(&self) -> String {
        match self {
            ViewState::SignedOut(AuthScreen::SignUp) => "SignUp".to_string(),
            ViewState::SignedOut(AuthScreen::Login) => "Login".to_string(),
            ViewState::SignedIn {
                screen: Screen::Dashboard,
                ..
            } => "Dashboard".to_string(),
            ViewState::SignedIn {
                screen: Screen::AgentDetail(name),
                ..
            } => format!("AgentDetail({})", name),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            ViewState::SignedIn { session, .. } => Some(session),
            ViewState::SignedOut(_) => None,
        }
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(
            self,
            ViewState::SignedIn {
                screen: Screen::Dashboard,
                ..
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RouteEvent {
    SignupSucceeded(Session),
    LoginSucceeded(Session),
    ShowLogin,
    ShowSignup,
    SelectAgent(String),
    Back,
    Logout,
}

impl RouteEvent {
    fn name(&self) -> &'static str {
        match self {
            RouteEvent::SignupSucceeded(_) => "complete signup",
            RouteEvent::LoginSucceeded(_) => "complete login",
            RouteEvent::ShowLogin => "show login",
            RouteEvent::ShowSignup => "show signup",
            RouteEvent::SelectAgent(_) => "select an agent",
            RouteEvent::Back => "go back",
            RouteEvent::Logout => "log out",
        }
    }
}

pub struct ViewRouter {
    state: ViewState,
    sessions: SessionStore,
}

impl ViewRouter {
    /// Read the persisted session once and pick the initial screen
    pub fn start(sessions: SessionStore) -> Self {
        let state = match sessions.load() {
            Some(session) => ViewState::SignedIn {
                session,
                screen: Screen::Dashboard,
            },
            None => ViewState::SignedOut(AuthScreen::SignUp),
        };
        debug!(view = %state.name(), "Router started");
        Self { state, sessions }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Apply one event. Illegal events leave the state untouched. Session
    /// side effects happen before the state changes; if they fail, the
    /// transition does not happen.
    pub fn dispatch(&mut self, event: RouteEvent) -> Result<&ViewState, DashboardError> {
        let next = match (&self.state, event) {
            (ViewState::SignedOut(AuthScreen::SignUp), RouteEvent::SignupSucceeded(session))
            | (ViewState::SignedOut(AuthScreen::Login), RouteEvent::LoginSucceeded(session)) => {
                self.sessions.save(&session)?;
                ViewState::SignedIn {
                    session,
                    screen: Screen::Dashboard,
                }
            }
            (ViewState::SignedOut(AuthScreen::SignUp), RouteEvent::ShowLogin) => {
                ViewState::SignedOut(AuthScreen::Login)
            }
            (ViewState::SignedOut(AuthScreen::Login), RouteEvent::ShowSignup) => {
                ViewState::SignedOut(AuthScreen::SignUp)
            }
            (
                ViewState::SignedIn {
                    session,
                    screen: Screen::Dashboard,
                },
                RouteEvent::SelectAgent(name),
            ) => ViewState::SignedIn {
                session: session.clone(),
                screen: Screen::AgentDetail(name),
            },
            (
                ViewState::SignedIn {
                    session,
                    screen: Screen::AgentDetail(_),
                },
                RouteEvent::Back,
            ) => ViewState::SignedIn {
                session: session.clone(),
                screen: Screen::Dashboard,
            },
            (
                ViewState::SignedIn {
                    screen: Screen::Dashboard,
                    ..
                },
                RouteEvent::Logout,
            ) => {
                self.sessions.clear()?;
                ViewState::SignedOut(AuthScreen::Login)
            }
            (state, event) => {
                return Err(DashboardError::IllegalTransition {
                    from: state.name(),
                    event: event.name().to_string(),
                })
            }
        };

        debug!(from = %self.state.name(), to = %next.name(), "View transition");
        self.state = next;
        Ok(&self.state)
    }
}
