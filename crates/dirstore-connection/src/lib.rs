//! Dirstore Connection - backend handle lifecycle for a configuration-serving host
//!
//! This crate owns the connection lifecycle: loading and decrypting
//! connection properties, constructing entry managers through a factory,
//! registering them under typed (name, qualifier) keys, hot-swapping them on
//! reload signals, and tearing everything down at shutdown.
//!
//! The host process drives it at three points: [`LifecycleController::on_start`],
//! [`LifecycleController::on_reload`] (or a [`ReloadSignal`] channel consumed
//! by [`events::run_reload_loop`]), and [`LifecycleController::on_stop`].

pub mod config;
pub mod events;
mod lifecycle;
mod registry;

pub use config::{AppSettings, ConfigSource, ConfigStore, FileConfigStore, METRIC_CONFIG_GROUP};
pub use events::ReloadSignal;
pub use lifecycle::{LifecycleController, LifecycleState, PERSISTENCE_ENTRY_NAME};
pub use registry::{EntryKey, EntryManagerRegistry};
