//! Factory trait for constructing entry managers

use std::sync::Arc;

use async_trait::async_trait;

use crate::{BackendHandle, ConnectionProperties, Result};

/// Factory producing live backend handles from decrypted connection properties
///
/// A successful return implies the handle is connected and ready for use.
/// The factory performs no retries; retry policy belongs to the caller.
///
/// # Errors
///
/// - `BackendUnreachable` when the initial connect/bind fails
/// - `InvalidConfiguration` when required keys are missing or malformed
#[async_trait]
pub trait EntryManagerFactory: Send + Sync + 'static {
    /// Create a new entry manager. `props` must already be fully decrypted.
    async fn create(&self, props: &ConnectionProperties) -> Result<BackendHandle>;
}

#[async_trait]
impl<T: EntryManagerFactory> EntryManagerFactory for Arc<T> {
    async fn create(&self, props: &ConnectionProperties) -> Result<BackendHandle> {
        (**self).create(props).await
    }
}
