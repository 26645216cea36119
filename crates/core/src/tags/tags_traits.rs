//! Traits for the tag cache and its network source.

use async_trait::async_trait;

use super::tags_model::{TagLoadState, TagMap};
use crate::errors::Result;

/// Network source of the full tag map.
#[async_trait]
pub trait TagApiTrait: Send + Sync {
    /// Fetch every tag definition. No retry or timeout is applied here.
    async fn fetch_tag_map(&self) -> Result<TagMap>;
}

/// Tag code to label lookup.
#[async_trait]
pub trait TagCacheTrait: Send + Sync {
    /// Explicit initialization step; callers await it before the first lookup.
    async fn initialize(&self) -> TagLoadState;

    /// Read the persisted tag map. Failures are logged, never returned.
    async fn load(&self);

    /// Fetch, replace and persist the tag map. Fetch failures propagate.
    async fn refresh(&self) -> Result<()>;

    /// Label for a tag code, `None` if unknown or not loaded yet.
    fn label_for(&self, code: &str) -> Option<String>;

    fn load_state(&self) -> TagLoadState;
}
