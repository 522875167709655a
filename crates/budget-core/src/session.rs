//! Bearer token storage between CLI invocations

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{AuthResponse, User};

/// A logged-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl From<AuthResponse> for Session {
    fn from(auth: AuthResponse) -> Self {
        Self {
            token: auth.token,
            user: Some(auth.user),
        }
    }
}

/// JSON file holding the current session
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform data directory (~/.local/share/budget-planner/session.json)
    pub fn open_default() -> Result<Self> {
        let path = default_session_path()
            .ok_or_else(|| Error::Session("No data directory available".into()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content).map_err(|e| {
            Error::Session(format!(
                "Corrupt session file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!("Loaded session from {}", self.path.display());
        Ok(Some(session))
    }

    /// Write the session atomically (temp file in the same directory, then rename)
    pub fn save(&self, session: &Session) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| Error::Session(format!("Invalid path {}", self.path.display())))?;
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            info!("Created session directory: {}", dir.display());
        }

        // NamedTempFile is created owner-only on unix
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        let json = serde_json::to_string_pretty(session)?;
        file.write_all(json.as_bytes())?;
        file.persist(&self.path)
            .map_err(|e| Error::Session(format!("Failed to save session: {}", e)))?;
        Ok(())
    }

    /// Remove the stored session; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

/// Default session file location
pub fn default_session_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budget-planner").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    fn session() -> Session {
        Session {
            token: "tok-123".to_string(),
            user: Some(User {
                id: "u1".to_string(),
                email: "asha@example.com".to_string(),
                name: "Asha".to_string(),
            }),
        }
    }

    #[test]
    fn test_load_missing_is_none() {
        let (_dir, store) = setup_store();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_creates_directory_and_loads_back() {
        let (_dir, store) = setup_store();
        store.save(&session()).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), Some(session()));
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = setup_store();
        store.save(&session()).unwrap();

        let replaced = Session {
            token: "tok-456".to_string(),
            user: None,
        };
        store.save(&replaced).unwrap();
        assert_eq!(store.load().unwrap().unwrap().token, "tok-456");
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = setup_store();
        assert!(!store.clear().unwrap());
        store.save(&session()).unwrap();
        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_is_session_error() {
        let (_dir, store) = setup_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "not json").unwrap();
        assert!(matches!(store.load(), Err(Error::Session(_))));
    }
}
