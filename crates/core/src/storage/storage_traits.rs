//! Repository trait for key-value persistence.

use async_trait::async_trait;

use crate::errors::Result;

/// Narrow key-value store backing the QR caches.
///
/// Both operations may fail. Callers in this crate log and recover from
/// failures instead of propagating them to the presentation layer.
#[async_trait]
pub trait KeyValueStoreTrait: Send + Sync {
    /// Get the value stored under `key`, `None` if nothing was stored.
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;
}
