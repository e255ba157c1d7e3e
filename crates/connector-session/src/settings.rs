//! Settings persistence.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use connector_protocols::{ConnectorSettings, SettingsError, SettingsStore};

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// TOML-backed settings store.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    /// Store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location:
    /// `<config dir>/browser-connector/settings.toml`.
    pub fn default_location() -> Result<Self, SettingsError> {
        let base = dirs::config_dir().ok_or_else(|| {
            SettingsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no user config directory",
            ))
        })?;
        Ok(Self::new(
            base.join("browser-connector").join("settings.toml"),
        ))
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<ConnectorSettings>, SettingsError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let settings =
                    toml::from_str(&content).map_err(|e| SettingsError::Parse(e.to_string()))?;
                Ok(Some(settings))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(SettingsError::Io(err)),
        }
    }

    async fn save(&self, settings: &ConnectorSettings) -> Result<(), SettingsError> {
        let content =
            toml::to_string_pretty(settings).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, content).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// In-memory settings store for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    inner: Mutex<Option<ConnectorSettings>>,
}

impl MemorySettingsStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record.
    pub fn with_settings(settings: ConnectorSettings) -> Self {
        Self {
            inner: Mutex::new(Some(settings)),
        }
    }

    /// Current record, if any.
    pub fn current(&self) -> Option<ConnectorSettings> {
        self.inner.lock().clone()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Option<ConnectorSettings>, SettingsError> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, settings: &ConnectorSettings) -> Result<(), SettingsError> {
        *self.inner.lock() = Some(settings.clone());
        Ok(())
    }
}
