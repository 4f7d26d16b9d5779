//! Entry manager trait and handle types

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;

/// Qualifier distinguishing multiple named instances of the same logical store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreQualifier {
    /// The primary, unqualified store
    Default,
    /// Store dedicated to metric entries
    Metrics,
    /// Central replica used for status replication
    CentralReplica,
}

impl StoreQualifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreQualifier::Default => "default",
            StoreQualifier::Metrics => "metrics",
            StoreQualifier::CentralReplica => "central-replica",
        }
    }
}

impl fmt::Display for StoreQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a handle operates against its backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationMode {
    /// Placeholder with no backend session
    Disabled,
    /// Live session, with a backend-reported descriptor (e.g. an endpoint)
    Connected(String),
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationMode::Disabled => f.write_str("disabled"),
            OperationMode::Connected(descriptor) => write!(f, "connected({descriptor})"),
        }
    }
}

/// A live connection handle to a directory-style backend
///
/// Handles are created by an [`EntryManagerFactory`](crate::EntryManagerFactory)
/// and owned by the registry entry that installed them; they are never reused
/// after `destroy`.
#[async_trait]
pub trait EntryManager: Send + Sync {
    /// Stable instance id, used to correlate create/destroy log lines
    fn instance_id(&self) -> Uuid;

    /// Backend kind (e.g. "ldap")
    fn backend_name(&self) -> &str;

    /// Concrete operation mode reported by the backend
    fn operation_mode(&self) -> OperationMode;

    /// Whether the handle still holds a usable session. Placeholders and
    /// destroyed handles report `false`.
    fn is_live(&self) -> bool;

    /// Close the backend session. Idempotent; destroying a placeholder or an
    /// already-destroyed handle is a no-op.
    async fn destroy(&self) -> Result<()>;
}

/// Shared handle to an entry manager
pub type BackendHandle = Arc<dyn EntryManager>;

/// No-op handle installed when a store is configured out (e.g. the central
/// replica when replication is disabled), so that lookups succeed without a
/// connection ever being attempted.
pub struct PlaceholderEntryManager {
    id: Uuid,
}

impl PlaceholderEntryManager {
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Convenience constructor returning the trait-object form
    pub fn handle() -> BackendHandle {
        Arc::new(Self::new())
    }
}

impl Default for PlaceholderEntryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryManager for PlaceholderEntryManager {
    fn instance_id(&self) -> Uuid {
        self.id
    }

    fn backend_name(&self) -> &str {
        "placeholder"
    }

    fn operation_mode(&self) -> OperationMode {
        OperationMode::Disabled
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn destroy(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_placeholder_is_inert() {
        let placeholder = PlaceholderEntryManager::new();
        assert!(!placeholder.is_live());
        assert_eq!(placeholder.operation_mode(), OperationMode::Disabled);
        // Destroy is a no-op, repeatable
        placeholder.destroy().await.unwrap();
        placeholder.destroy().await.unwrap();
    }

    #[test]
    fn test_qualifier_display() {
        assert_eq!(StoreQualifier::Default.to_string(), "default");
        assert_eq!(StoreQualifier::CentralReplica.to_string(), "central-replica");
    }
}
