//! Persisted login session and theme preference.
//!
//! These are the only values that outlive a dashboard instance. Each store is
//! the single write path for its key.

use crate::error::DashboardError;
use crate::storage::{load_json, save_json, KeyValueStorage};
use shared::{Session, ThemePreference};
use std::sync::Arc;
use tracing::{debug, info};

pub const SESSION_KEY: &str = "user";
pub const THEME_KEY: &str = "theme";

#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Option<Session> {
        let session: Option<Session> = load_json(self.storage.as_ref(), SESSION_KEY);
        debug!(found = session.is_some(), "Loaded session from local storage");
        session
    }

    pub fn save(&self, session: &Session) -> Result<(), DashboardError> {
        save_json(self.storage.as_ref(), SESSION_KEY, session)?;
        info!(email = %session.email, admin_id = %session.admin_id, "Session saved");
        Ok(())
    }

    /// Remove the session. Clearing an absent session is a no-op.
    pub fn clear(&self) -> Result<(), DashboardError> {
        self.storage.remove_item(SESSION_KEY)?;
        info!("Session cleared");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ThemeStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl ThemeStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Stored preference, or the default (light) when none is set
    pub fn load(&self) -> ThemePreference {
        load_json(self.storage.as_ref(), THEME_KEY).unwrap_or_default()
    }

    pub fn save(&self, preference: ThemePreference) -> Result<(), DashboardError> {
        save_json(self.storage.as_ref(), THEME_KEY, &preference)
    }

    /// Flip light/dark and persist the result
    pub fn toggle(&self) -> Result<ThemePreference, DashboardError> {
        let next = ThemePreference {
            mode: self.load().mode.toggled(),
        };
        self.save(next)?;
        debug!(mode = ?next.mode, "Theme toggled");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use shared::ThemeMode;

    fn storage() -> Arc<dyn KeyValueStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_session_save_load_clear() {
        let store = SessionStore::new(storage());
        assert!(store.load().is_none());

        let session = Session::new("ops@example.com", "adm-7");
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));

        store.clear().unwrap();
        assert!(store.load().is_none());

        // Idempotent
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_theme_survives_session_clear() {
        let storage = storage();
        let sessions = SessionStore::new(storage.clone());
        let themes = ThemeStore::new(storage);

        assert_eq!(themes.load().mode, ThemeMode::Light);
        sessions.save(&Session::new("a@b.c", "adm")).unwrap();
        assert_eq!(themes.toggle().unwrap().mode, ThemeMode::Dark);

        sessions.clear().unwrap();
        assert_eq!(themes.load().mode, ThemeMode::Dark);
    }
}
