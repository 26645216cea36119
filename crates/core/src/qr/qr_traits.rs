//! Traits for the self QR service and its network source.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::qr_model::{QrFreshness, RawQrPayload};
use super::self_qr::SelfQr;
use crate::errors::Result;

/// Network source of the device owner's QR.
#[async_trait]
pub trait QrApiTrait: Send + Sync {
    /// Fetch a freshly issued QR. Fails with a network, parse or
    /// not-verified error; no retry or timeout is applied here.
    async fn fetch_self_qr(&self) -> Result<RawQrPayload>;
}

/// Single-slot holder of the self QR.
#[async_trait]
pub trait SelfQrServiceTrait: Send + Sync {
    /// In-memory QR, restored from storage on first use. Storage failures
    /// are logged and reported as `None`.
    async fn get_current(&self) -> Option<Arc<SelfQr>>;

    /// Persist a freshly fetched payload and make it the current QR.
    async fn set_from_fetch(&self, payload: RawQrPayload) -> Arc<SelfQr>;

    /// In-memory QR without touching storage.
    fn current(&self) -> Option<Arc<SelfQr>>;

    fn current_freshness(&self) -> QrFreshness {
        self.current_freshness_at(Utc::now())
    }

    /// `Failed` when no QR is held.
    fn current_freshness_at(&self, now: DateTime<Utc>) -> QrFreshness {
        match self.current() {
            Some(qr) => qr.freshness_at(now),
            None => QrFreshness::Failed,
        }
    }
}
