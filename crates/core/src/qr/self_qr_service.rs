use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use std::sync::{Arc, PoisonError, RwLock};

use super::qr_model::RawQrPayload;
use super::qr_traits::SelfQrServiceTrait;
use super::self_qr::SelfQr;
use crate::constants::SELF_QR_STORAGE_KEY;
use crate::errors::Result;
use crate::storage::KeyValueStoreTrait;

/// Holds the self QR and keeps its persisted copy in sync.
///
/// One instance per application; the persisted copy is a single slot that is
/// overwritten by every successful fetch.
pub struct SelfQrService {
    store: Arc<dyn KeyValueStoreTrait>,
    current: RwLock<Option<Arc<SelfQr>>>,
}

impl SelfQrService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        SelfQrService {
            store,
            current: RwLock::new(None),
        }
    }

    async fn restore(&self) -> Result<Option<SelfQr>> {
        match self.store.get_item(SELF_QR_STORAGE_KEY).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn persist(&self, qr: &SelfQr) -> Result<()> {
        let raw = serde_json::to_string(qr)?;
        self.store.set_item(SELF_QR_STORAGE_KEY, &raw).await
    }
}

#[async_trait]
impl SelfQrServiceTrait for SelfQrService {
    async fn get_current(&self) -> Option<Arc<SelfQr>> {
        if let Some(qr) = self.current() {
            return Some(qr);
        }

        let restored = match self.restore().await {
            Ok(Some(qr)) => Arc::new(qr),
            Ok(None) => {
                debug!("No persisted self QR");
                return None;
            }
            Err(e) => {
                warn!("Failed to restore persisted self QR: {}", e);
                return None;
            }
        };

        // A fetch may have landed while storage was being read; it wins.
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        Some(Arc::clone(slot.get_or_insert(restored)))
    }

    async fn set_from_fetch(&self, payload: RawQrPayload) -> Arc<SelfQr> {
        let qr = Arc::new(SelfQr::new(payload, Utc::now()));

        if let Err(e) = self.persist(&qr).await {
            warn!("Failed to persist self QR: {}", e);
        }

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&qr));
        debug!("Self QR replaced (issued at {})", qr.issued_at());
        qr
    }

    fn current(&self) -> Option<Arc<SelfQr>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
