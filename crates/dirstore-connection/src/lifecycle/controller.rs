//! Lifecycle controller state machine

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use dirstore_core::{
    BackendHandle, ConnectionProperties, DirstoreError, EntryManagerFactory,
    PlaceholderEntryManager, Result, StoreQualifier,
};

use crate::config::{AppSettings, ConfigSource, METRIC_CONFIG_GROUP};
use crate::events::ReloadSignal;
use crate::registry::{EntryKey, EntryManagerRegistry};

/// Logical name shared by the persistence entries; instances are told apart
/// by their [`StoreQualifier`]
pub const PERSISTENCE_ENTRY_NAME: &str = "persistence";

/// Upper bound on a single factory construction. The backend bind is a
/// blocking network operation and must not stall startup or a reload
/// indefinitely.
const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_secs(30);

/// Controller lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Stopped => "stopped",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Orchestrates entry manager construction, hot-swap, and teardown
///
/// One instance per host process. `on_start` and `on_stop` are driven by the
/// host's bootstrap layer; `on_reload` may be called concurrently for
/// different groups and is serialized per group internally.
pub struct LifecycleController {
    source: ConfigSource,
    factory: Arc<dyn EntryManagerFactory>,
    registry: Arc<EntryManagerRegistry>,
    state: RwLock<LifecycleState>,
    // Per-group serialization; construction and destruction happen while
    // holding only the lock of the group being reloaded.
    primary_lock: Mutex<()>,
    central_lock: Mutex<()>,
    create_timeout: Duration,
}

impl LifecycleController {
    pub fn new(
        source: ConfigSource,
        factory: Arc<dyn EntryManagerFactory>,
        registry: Arc<EntryManagerRegistry>,
    ) -> Self {
        Self {
            source,
            factory,
            registry,
            state: RwLock::new(LifecycleState::Stopped),
            primary_lock: Mutex::new(()),
            central_lock: Mutex::new(()),
            create_timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }

    /// Override the bound on factory construction time
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = timeout;
        self
    }

    /// The registry owning the live handles
    pub fn registry(&self) -> &Arc<EntryManagerRegistry> {
        &self.registry
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.read()
    }

    /// Stand up every required store: primary always, metrics when enabled,
    /// central replica when active and configured (placeholder otherwise).
    ///
    /// A construction failure aborts startup, is returned to the host, and
    /// any partially installed entries are torn down again.
    #[tracing::instrument(skip(self))]
    pub async fn on_start(&self) -> Result<()> {
        {
            let mut state = self.state.write();
            if *state != LifecycleState::Stopped {
                return Err(DirstoreError::Lifecycle(format!(
                    "cannot start while {state}"
                )));
            }
            *state = LifecycleState::Starting;
        }
        tracing::info!("starting backend entry managers");

        match self.start_stores().await {
            Ok(()) => {
                *self.state.write() = LifecycleState::Running;
                tracing::info!(entries = self.registry.len(), "startup complete");
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "startup failed");
                for (key, handle) in self.registry.drain() {
                    destroy_quietly(&key, &handle).await;
                }
                *self.state.write() = LifecycleState::Stopped;
                Err(err)
            }
        }
    }

    async fn start_stores(&self) -> Result<()> {
        let settings = self.source.settings().await?;

        let handle = self.build_from_group(None).await?;
        self.install(self.key(StoreQualifier::Default), handle);

        if settings.metrics_enabled {
            let handle = self.build_from_group(Some(METRIC_CONFIG_GROUP)).await?;
            self.install(self.key(StoreQualifier::Metrics), handle);
        }

        let central = self.build_central(&settings).await?;
        self.install(self.key(StoreQualifier::CentralReplica), central);

        Ok(())
    }

    /// Rebuild the entries belonging to the signalled group.
    ///
    /// Order per entry: build new with fresh properties, install, then
    /// destroy the displaced handle. A build failure keeps the previous
    /// handle installed and untouched; nothing escapes to the event source.
    #[tracing::instrument(skip(self), fields(signal = %signal))]
    pub async fn on_reload(&self, signal: ReloadSignal) {
        let _guard = match signal {
            ReloadSignal::Primary => self.primary_lock.lock().await,
            ReloadSignal::CentralReplica => self.central_lock.lock().await,
        };
        // Re-checked under the group lock: a stop that won the race must not
        // be followed by a handle resurrected into a drained registry.
        if *self.state.read() != LifecycleState::Running {
            tracing::warn!(signal = %signal, "ignoring reload signal while not running");
            return;
        }

        match signal {
            ReloadSignal::Primary => {
                let built = self.build_from_group(None).await;
                self.swap_in(self.key(StoreQualifier::Default), built).await;

                // The metrics entry shares the primary trigger group but is
                // an independent second entry; rebuilt only if installed.
                let metrics_key = self.key(StoreQualifier::Metrics);
                if self.registry.contains(&metrics_key) {
                    let built = self.build_from_group(Some(METRIC_CONFIG_GROUP)).await;
                    self.swap_in(metrics_key, built).await;
                }
            }
            ReloadSignal::CentralReplica => {
                // Flags and replica config may have changed, so the rebuild
                // can legitimately yield a placeholder.
                let built = match self.source.settings().await {
                    Ok(settings) => self.build_central(&settings).await,
                    Err(err) => Err(err),
                };
                self.swap_in(self.key(StoreQualifier::CentralReplica), built)
                    .await;
            }
        }
    }

    /// Destroy every installed entry. Best effort: each failure is logged
    /// and never prevents sibling destruction. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn on_stop(&self) {
        {
            let mut state = self.state.write();
            if matches!(*state, LifecycleState::Stopped | LifecycleState::Stopping) {
                tracing::debug!("already stopped");
                return;
            }
            *state = LifecycleState::Stopping;
        }
        tracing::info!("stopping entry managers and closing backend connections");

        // Wait out in-flight reloads so nothing lands after the drain
        let _primary = self.primary_lock.lock().await;
        let _central = self.central_lock.lock().await;

        for (key, handle) in self.registry.drain() {
            destroy_quietly(&key, &handle).await;
        }
        *self.state.write() = LifecycleState::Stopped;
        tracing::info!("shutdown complete");
    }

    fn key(&self, qualifier: StoreQualifier) -> EntryKey {
        EntryKey::new(PERSISTENCE_ENTRY_NAME, qualifier)
    }

    async fn build_from_group(&self, group: Option<&str>) -> Result<BackendHandle> {
        let props = self.source.load(group).await?;
        self.create_handle(&props).await
    }

    /// Build the central-replica handle, or a placeholder when replication
    /// is inactive or no replica is configured. An inactive or absent
    /// replica must never block startup, and no connection is attempted.
    async fn build_central(&self, settings: &AppSettings) -> Result<BackendHandle> {
        if !settings.central_replica_active() {
            tracing::info!("central replica inactive, using placeholder");
            return Ok(PlaceholderEntryManager::handle());
        }
        match self.source.load_central().await? {
            Some(props) => self.create_handle(&props).await,
            None => {
                tracing::info!("central replica not configured, using placeholder");
                Ok(PlaceholderEntryManager::handle())
            }
        }
    }

    async fn create_handle(&self, props: &ConnectionProperties) -> Result<BackendHandle> {
        match tokio::time::timeout(self.create_timeout, self.factory.create(props)).await {
            Ok(result) => result,
            Err(_) => Err(DirstoreError::BackendUnreachable(format!(
                "backend construction did not complete within {:?}",
                self.create_timeout
            ))),
        }
    }

    fn install(&self, key: EntryKey, handle: BackendHandle) {
        tracing::info!(
            entry = %key,
            instance = %handle.instance_id(),
            mode = %handle.operation_mode(),
            "created entry manager"
        );
        self.registry.install(key, handle);
    }

    /// Install a freshly built handle, then destroy exactly the handle it
    /// displaced. On a build failure the previous handle stays installed.
    async fn swap_in(&self, key: EntryKey, built: Result<BackendHandle>) {
        match built {
            Ok(new) => {
                tracing::info!(
                    entry = %key,
                    instance = %new.instance_id(),
                    mode = %new.operation_mode(),
                    "recreated entry manager"
                );
                if let Some(displaced) = self.registry.install(key.clone(), new) {
                    destroy_quietly(&key, &displaced).await;
                }
            }
            Err(err) => {
                tracing::error!(
                    entry = %key,
                    error = %err,
                    "reload failed, keeping previous entry manager"
                );
            }
        }
    }
}

/// Best-effort destroy. Never propagates: placeholders and dead handles are
/// skipped, failures are logged with the entry's identity.
async fn destroy_quietly(key: &EntryKey, handle: &BackendHandle) {
    if !handle.is_live() {
        tracing::debug!(
            entry = %key,
            instance = %handle.instance_id(),
            "skipping destroy of inert entry manager"
        );
        return;
    }
    tracing::debug!(
        entry = %key,
        instance = %handle.instance_id(),
        mode = %handle.operation_mode(),
        "destroying entry manager"
    );
    if let Err(err) = handle.destroy().await {
        tracing::warn!(
            entry = %key,
            instance = %handle.instance_id(),
            error = %err,
            "failed to destroy entry manager"
        );
    }
}
