//! Typed reload signals
//!
//! The host's configuration watcher emits a [`ReloadSignal`] whenever a
//! logical group's credentials change. Signals can be fed to
//! [`LifecycleController::on_reload`](crate::LifecycleController::on_reload)
//! directly, or pushed through a channel consumed by [`run_reload_loop`].

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::LifecycleController;

/// Which logical group's credentials changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReloadSignal {
    /// Primary store configuration changed; also re-triggers the
    /// metrics-qualified entry, which shares the same trigger group.
    Primary,
    /// Central replica configuration changed
    CentralReplica,
}

impl fmt::Display for ReloadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadSignal::Primary => f.write_str("primary"),
            ReloadSignal::CentralReplica => f.write_str("central-replica"),
        }
    }
}

/// Consume reload signals until the channel closes.
///
/// Signals are handled one at a time in arrival order. Callers that need
/// unrelated groups to reload concurrently can invoke
/// [`LifecycleController::on_reload`] from their own tasks instead; the
/// controller serializes per group, not globally.
pub async fn run_reload_loop(
    controller: Arc<LifecycleController>,
    mut signals: mpsc::Receiver<ReloadSignal>,
) {
    while let Some(signal) = signals.recv().await {
        tracing::debug!(signal = %signal, "reload signal received");
        controller.on_reload(signal).await;
    }
    tracing::debug!("reload signal channel closed");
}
