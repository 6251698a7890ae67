//! Persisted user preferences behind a small key-value interface.

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::theme::Theme;

/// Key under which the selected theme is stored.
pub const THEME_KEY: &str = "kawaii_theme";

pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read the persisted theme; absent or unrecognised values give the default.
pub fn load_theme(store: &dyn PreferenceStore) -> Theme {
    match store.get(THEME_KEY) {
        Ok(Some(value)) => value.parse::<Theme>().unwrap_or_else(|err| {
            tracing::warn!("Ignoring stored theme: {err}");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(err) => {
            tracing::warn!("Failed to read theme preference: {err:#}");
            Theme::default()
        }
    }
}

pub fn save_theme(store: &mut dyn PreferenceStore, theme: Theme) -> Result<()> {
    store.set(THEME_KEY, theme.as_str())
}

/// Preferences kept in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences stored as a flat TOML table. Every `set` rewrites the file.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FilePreferences {
    /// Open the store in the platform config directory.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::config::config_dir()?.join("preferences.toml"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse preferences file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(&self.values)
            .context("Failed to serialize preferences to TOML")?;

        fs::write(&self.path, toml)
            .with_context(|| format!("Failed to write preferences file: {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_theme_defaults_to_sakura() {
        let store = MemoryPreferences::new();
        assert_eq!(load_theme(&store), Theme::Sakura);
    }

    #[test]
    fn unknown_stored_theme_defaults_to_sakura() {
        let mut store = MemoryPreferences::new();
        store.set(THEME_KEY, "vaporwave").unwrap();
        assert_eq!(load_theme(&store), Theme::Sakura);
    }

    #[test]
    fn save_theme_writes_identifier() {
        let mut store = MemoryPreferences::new();
        save_theme(&mut store, Theme::Cotton).unwrap();

        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("cotton"));
        assert_eq!(load_theme(&store), Theme::Cotton);
    }

    #[test]
    fn file_store_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.toml");

        let mut store = FilePreferences::open(&path).unwrap();
        assert_eq!(load_theme(&store), Theme::Sakura);
        save_theme(&mut store, Theme::Midnight).unwrap();

        let reopened = FilePreferences::open(&path).unwrap();
        assert_eq!(load_theme(&reopened), Theme::Midnight);
        assert!(fs::read_to_string(&path).unwrap().contains("kawaii_theme"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        fs::write(&path, "kawaii_theme = [").unwrap();

        let err = FilePreferences::open(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse preferences file"));
    }
}
