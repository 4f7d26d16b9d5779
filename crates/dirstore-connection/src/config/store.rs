//! Raw configuration store access

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dirstore_core::{ConnectionProperties, DirstoreError, Result};

use super::AppSettings;

/// File names read by [`FileConfigStore`] under its base directory
const PRIMARY_PROPERTIES_FILE: &str = "dirstore.properties";
const CENTRAL_PROPERTIES_FILE: &str = "dirstore-central.properties";
const SETTINGS_FILE: &str = "dirstore.json";

/// Source of raw (possibly encrypted) per-group connection properties and
/// application flags.
#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// Raw properties for the primary store. The metrics store derives from
    /// these via `metric.`-prefixed overrides.
    async fn primary_properties(&self) -> Result<ConnectionProperties>;

    /// Raw properties for the central replica, or `None` when no replica is
    /// configured.
    async fn central_properties(&self) -> Result<Option<ConnectionProperties>>;

    /// Application flags controlling which stores are stood up
    async fn settings(&self) -> Result<AppSettings>;
}

/// Configuration store backed by files in a base directory
///
/// Files are re-read on every call; nothing is cached, so reloads always see
/// current contents. A missing central properties file means "no replica
/// configured" rather than an error, and missing settings fall back to
/// defaults.
pub struct FileConfigStore {
    base_dir: PathBuf,
}

impl FileConfigStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    async fn read_properties(&self, file_name: &str) -> Result<ConnectionProperties> {
        let path = self.base_dir.join(file_name);
        let text = read_file(&path).await?;
        ConnectionProperties::parse(&text)
    }
}

async fn read_file(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|err| {
        DirstoreError::ConfigUnavailable(format!("cannot read {}: {err}", path.display()))
    })
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn primary_properties(&self) -> Result<ConnectionProperties> {
        self.read_properties(PRIMARY_PROPERTIES_FILE).await
    }

    async fn central_properties(&self) -> Result<Option<ConnectionProperties>> {
        let path = self.base_dir.join(CENTRAL_PROPERTIES_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no central replica properties file");
            return Ok(None);
        }
        self.read_properties(CENTRAL_PROPERTIES_FILE).await.map(Some)
    }

    async fn settings(&self) -> Result<AppSettings> {
        let path = self.base_dir.join(SETTINGS_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(AppSettings::default());
        }
        let text = read_file(&path).await?;
        let settings: AppSettings = serde_json::from_str(&text).map_err(|err| {
            DirstoreError::InvalidConfiguration(format!(
                "malformed settings {}: {err}",
                path.display()
            ))
        })?;
        Ok(settings)
    }
}
