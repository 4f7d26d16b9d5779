//! Decrypted, group-scoped property loading

use std::sync::Arc;

use dirstore_core::{ConnectionProperties, Decrypter, Result};

use super::{AppSettings, ConfigStore};

/// Loads fresh connection properties for a logical group, decrypting every
/// secret before the caller sees them.
///
/// Nothing is cached: each `load` re-reads the store so that a reload after a
/// credential rotation picks up the new values.
pub struct ConfigSource {
    store: Arc<dyn ConfigStore>,
    decrypter: Arc<dyn Decrypter>,
}

impl ConfigSource {
    pub fn new(store: Arc<dyn ConfigStore>, decrypter: Arc<dyn Decrypter>) -> Self {
        Self { store, decrypter }
    }

    /// Load primary-store properties, decrypted, with `group`'s prefixed
    /// overrides applied when a group id is given.
    #[tracing::instrument(skip(self), fields(group = group.unwrap_or("")))]
    pub async fn load(&self, group: Option<&str>) -> Result<ConnectionProperties> {
        let raw = self.store.primary_properties().await?;
        let plain = self.decrypter.decrypt_all(&raw)?;
        tracing::debug!(properties = plain.len(), "loaded connection properties");
        Ok(plain.scoped_to_group(group))
    }

    /// Load central-replica properties, decrypted. `None` when no replica is
    /// configured.
    #[tracing::instrument(skip(self))]
    pub async fn load_central(&self) -> Result<Option<ConnectionProperties>> {
        match self.store.central_properties().await? {
            Some(raw) => Ok(Some(self.decrypter.decrypt_all(&raw)?)),
            None => Ok(None),
        }
    }

    /// Current application flags
    pub async fn settings(&self) -> Result<AppSettings> {
        self.store.settings().await
    }
}
