//! Application flags controlling which stores are stood up

use serde::{Deserialize, Serialize};

/// Flags read at startup (and re-read on central-replica reloads) that decide
/// which backend stores get live connections.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Whether the metrics-qualified store is stood up at startup
    #[serde(default)]
    pub metrics_enabled: bool,

    /// Whether central-replica replication is configured at all
    #[serde(default)]
    pub replication_enabled: bool,

    /// Whether this node pushes status updates to the central replica.
    /// The central store only gets a live connection when both this and
    /// `replication_enabled` are set.
    #[serde(default)]
    pub update_status: bool,
}

impl AppSettings {
    /// Whether the central replica should be connected rather than stubbed
    /// out with a placeholder
    pub fn central_replica_active(&self) -> bool {
        self.replication_enabled && self.update_status
    }
}
