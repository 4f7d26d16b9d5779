//! Lifecycle orchestration for backend entry managers
//!
//! The controller reacts to three host events: process start, process stop,
//! and per-group reload signals. On start it stands up the primary store, the
//! metrics-qualified store when enabled, and the central replica (or a
//! placeholder when replication is inactive). On reload it rebuilds only the
//! affected entries, installing the fresh handle before destroying the one it
//! displaced so a working connection is never dropped on failure. On stop it
//! destroys every installed handle, best effort.

mod controller;


pub use controller::{LifecycleController, LifecycleState, PERSISTENCE_ENTRY_NAME};
