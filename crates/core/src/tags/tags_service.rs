use async_trait::async_trait;
use log::{debug, warn};
use std::sync::{Arc, PoisonError, RwLock};

use super::tags_model::{TagLoadState, TagMap};
use super::tags_traits::{TagApiTrait, TagCacheTrait};
use crate::constants::TAG_MAP_STORAGE_KEY;
use crate::errors::Result;
use crate::storage::KeyValueStoreTrait;

/// Tag lookup backed by the key-value store and refreshed from the network.
///
/// Nothing is loaded on construction; callers await [`TagCacheTrait::initialize`]
/// and until then every lookup returns `None`.
pub struct TagCache {
    store: Arc<dyn KeyValueStoreTrait>,
    api: Arc<dyn TagApiTrait>,
    tags: RwLock<Option<TagMap>>,
}

impl TagCache {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>, api: Arc<dyn TagApiTrait>) -> Self {
        TagCache {
            store,
            api,
            tags: RwLock::new(None),
        }
    }

    /// Snapshot of the loaded tag map.
    pub fn tags(&self) -> Option<TagMap> {
        self.tags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, tags: TagMap) {
        *self.tags.write().unwrap_or_else(PoisonError::into_inner) = Some(tags);
    }

    async fn read_persisted(&self) -> Result<Option<TagMap>> {
        match self.store.get_item(TAG_MAP_STORAGE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl TagCacheTrait for TagCache {
    async fn initialize(&self) -> TagLoadState {
        self.load().await;
        self.load_state()
    }

    async fn load(&self) {
        match self.read_persisted().await {
            Ok(Some(tags)) => {
                debug!("Loaded {} cached tags", tags.len());
                self.replace(tags);
            }
            Ok(None) => debug!("No cached tag map found"),
            Err(e) => warn!("Failed to load cached tag map: {}", e),
        }
    }

    async fn refresh(&self) -> Result<()> {
        let tags = self.api.fetch_tag_map().await?;
        debug!("Fetched {} tags", tags.len());

        let serialized = serde_json::to_string(&tags);
        self.replace(tags);

        let persisted = match serialized {
            Ok(raw) => self.store.set_item(TAG_MAP_STORAGE_KEY, &raw).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = persisted {
            warn!("Failed to persist tag map: {}", e);
        }
        Ok(())
    }

    fn label_for(&self, code: &str) -> Option<String> {
        self.tags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|tags| tags.label_for(code))
            .map(str::to_string)
    }

    fn load_state(&self) -> TagLoadState {
        if self
            .tags
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
        {
            TagLoadState::Loaded
        } else {
            TagLoadState::NotLoaded
        }
    }
}
