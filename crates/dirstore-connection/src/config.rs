//! Configuration loading and decryption for backend stores
//!
//! Raw, possibly-encrypted connection properties come from a [`ConfigStore`]
//! (file-backed in production, mocked in tests). [`ConfigSource`] combines a
//! store with a [`Decrypter`](dirstore_core::Decrypter) and hands out fully
//! decrypted, group-scoped properties. Properties are re-read on every call
//! so that a reload always sees fresh credentials.

mod settings;
mod source;
mod store;


pub use settings::AppSettings;
pub use source::ConfigSource;
pub use store::{ConfigStore, FileConfigStore};

/// Group id whose prefixed properties override the globals for the
/// metrics-qualified store
pub const METRIC_CONFIG_GROUP: &str = "metric";
