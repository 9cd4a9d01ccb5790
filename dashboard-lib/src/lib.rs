//! Agent Dashboard core
//!
//! Client-side state for the admin dashboard: the persisted login session
//! and theme, the screen router, and the controller that periodically syncs
//! the backend, polls the agent roster and composes both into one snapshot.
//!
//! # Overview
//!
//! - `App` - entry point for a UI shell: auth forms, navigation, theme
//! - `DashboardController` - timers, sync/roster calls, `DashboardSnapshot`
//! - `ViewRouter` - screen state machine gated by the session
//! - `SessionStore` / `ThemeStore` - persisted state over `KeyValueStorage`
//!
//! # Example
//!
//! ```ignore
//! use dashboard_lib::{App, DashboardConfig, FileStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::default();
//!     let (auth, backends) = config.connect()?;
//!     let storage = Arc::new(FileStorage::in_default_location()?);
//!
//!     let mut app = App::start(storage, auth, backends, config.poll.clone());
//!     app.go_to_login()?;
//!     app.login("ops@example.com", "secret").await?;
//!
//!     if let Some(snapshot) = app.dashboard_snapshot() {
//!         println!("{}", snapshot.last_sync);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod backend;
pub mod client;
pub mod config;
pub mod controller;
pub mod countdown;
pub mod error;
pub mod history;
pub mod roster;
pub mod router;
pub mod scheduler;
pub mod session_store;
pub mod storage;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use app::App;
pub use backend::{AuthBackend, RosterSource, SyncBackend};
pub use client::{DocumentRosterClient, NativeApiClient};
pub use config::{DashboardConfig, PollSettings, RosterSourceConfig};
pub use controller::{DashboardBackends, DashboardController, DashboardSnapshot, SyncStatus};
pub use countdown::Countdown;
pub use error::{DashboardError, ValidationError};
pub use history::WriteHistory;
pub use router::{AuthScreen, RouteEvent, Screen, ViewRouter, ViewState};
pub use session_store::{SessionStore, ThemeStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
