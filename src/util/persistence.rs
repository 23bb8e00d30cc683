use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "RoadsOfBabel";
const APP_NAME: &str = "RoadsOfBabel";

/// Bearer token saved between runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
}

/// File-backed slot for the session token.
#[derive(Clone, Debug)]
pub struct TokenStore {
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Store in the platform config directory.
    pub fn default_location() -> Self {
        let path = ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| dirs.config_dir().join("session.json"));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Missing or unreadable files read as "no token".
    pub fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let data = fs::read_to_string(path).ok()?;
        match serde_json::from_str::<StoredToken>(&data) {
            Ok(stored) if !stored.access_token.is_empty() => Some(stored.access_token),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!("ignoring unreadable session file {}: {err}", path.display());
                None
            }
        }
    }

    pub fn save(&self, token: &str) -> Result<(), PersistError> {
        let path = self.path.as_ref().ok_or(PersistError::StorageUnavailable)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&StoredToken {
            access_token: token.to_string(),
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), PersistError> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::at(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load(), None);
        store.save("tok-123").unwrap();
        assert_eq!(store.load().as_deref(), Some("tok-123"));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }

    #[test]
    fn garbage_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(TokenStore::at(path).load(), None);
    }

    #[test]
    fn no_location_cannot_save() {
        let store = TokenStore { path: None };
        assert!(matches!(
            store.save("x"),
            Err(PersistError::StorageUnavailable)
        ));
        assert!(store.clear().is_ok());
    }
}
