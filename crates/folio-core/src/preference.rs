//! File-backed theme preference

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PreferenceError;
use crate::theme::ThemeMode;
use crate::traits::ThemePreferenceStore;

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    mode: ThemeMode,
}

/// Stores the theme preference as a small JSON document
///
/// A missing file means no preference yet. Parent directories are created
/// on first save.
#[derive(Debug, Clone)]
pub struct JsonPreferenceStore {
    path: PathBuf,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemePreferenceStore for JsonPreferenceStore {
    fn load(&self) -> Result<Option<ThemeMode>, PreferenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredPreference = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), mode = %stored.mode, "Loaded theme preference");
        Ok(Some(stored.mode))
    }

    fn save(&self, mode: ThemeMode) -> Result<(), PreferenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(&StoredPreference { mode })?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path().join("theme.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonPreferenceStore::new(dir.path().join("nested/theme.json"));

        store.save(ThemeMode::Light).unwrap();
        assert_eq!(store.load().unwrap(), Some(ThemeMode::Light));

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"light\""));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(&path, "not json").unwrap();

        let store = JsonPreferenceStore::new(path);
        assert!(matches!(store.load(), Err(PreferenceError::Encoding(_))));
    }
}
