//! Shared mocks for unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::{DatabaseError, Error, Result};
use crate::qr::{QrImage, QrPayloadData, QrTag, RawQrPayload};
use crate::risk::RiskCode;
use crate::storage::KeyValueStoreTrait;
use crate::tags::{TagApiTrait, TagEntry, TagMap};

// =========================================================================
// Mock KeyValueStore
// =========================================================================

#[derive(Clone, Default)]
pub struct MockKeyValueStore {
    items: Arc<Mutex<HashMap<String, String>>>,
    fail_on_get: Arc<Mutex<bool>>,
    fail_on_set: Arc<Mutex<bool>>,
    gets: Arc<AtomicUsize>,
}

impl MockKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.put(key, value);
        store
    }

    pub fn put(&self, key: &str, value: &str) {
        self.items
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap().get(key).cloned()
    }

    pub fn set_fail_on_get(&self, fail: bool) {
        *self.fail_on_get.lock().unwrap() = fail;
    }

    pub fn set_fail_on_set(&self, fail: bool) {
        *self.fail_on_set.lock().unwrap() = fail;
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStoreTrait for MockKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if *self.fail_on_get.lock().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "Intentional read failure".into(),
            )));
        }
        Ok(self.items.lock().unwrap().get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if *self.fail_on_set.lock().unwrap() {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "Intentional write failure".into(),
            )));
        }
        self.put(key, value);
        Ok(())
    }
}

// =========================================================================
// Mock TagApi
// =========================================================================

#[derive(Clone, Default)]
pub struct MockTagApi {
    tags: Arc<Mutex<Option<TagMap>>>,
}

impl MockTagApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serving(tags: TagMap) -> Self {
        let api = Self::new();
        api.set_tags(Some(tags));
        api
    }

    /// `None` makes every fetch fail.
    pub fn set_tags(&self, tags: Option<TagMap>) {
        *self.tags.lock().unwrap() = tags;
    }
}

#[async_trait]
impl TagApiTrait for MockTagApi {
    async fn fetch_tag_map(&self) -> Result<TagMap> {
        self.tags
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Network("Intentional fetch failure".into()))
    }
}

// =========================================================================
// Fixtures
// =========================================================================

pub fn tag_map(entries: &[(&str, &str)]) -> TagMap {
    TagMap::new(
        entries
            .iter()
            .map(|(code, label)| TagEntry {
                name: format!("tag-{}", code),
                code: code.to_string(),
                label: label.to_string(),
            })
            .collect(),
    )
}

pub fn raw_payload(code: RiskCode) -> RawQrPayload {
    RawQrPayload {
        data: QrPayloadData {
            anonymous_id: "anon-123".to_string(),
            code,
            tag: Some(QrTag {
                id: "t1".to_string(),
                title: "Returning traveller".to_string(),
                description: Some("Arrived within 14 days".to_string()),
                color: Some("#FFAA00".to_string()),
            }),
        },
        qr: QrImage {
            mime_type: "image/png".to_string(),
            base64: "iVBORw0KGgo=".to_string(),
        },
    }
}
