//! Refresh controller for the self QR.
//!
//! The controller hydrates the presentation state from the persisted QR, then
//! keeps it fresh: a successful fetch schedules the next refresh after
//! `refresh_interval`, a failed one schedules a retry after `retry_interval`.
//! Every cycle takes a new generation number and a completion is only applied
//! while its generation is still current, so a cycle superseded by a newer one
//! or by deactivation never publishes.

use chrono::Utc;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::qr_model::QrFreshness;
use super::qr_traits::{QrApiTrait, SelfQrServiceTrait};
use super::self_qr::SelfQr;
use crate::constants::{QR_REFRESH_INTERVAL, QR_RETRY_INTERVAL};

/// Refresh timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub refresh_interval: Duration,
    pub retry_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            refresh_interval: QR_REFRESH_INTERVAL,
            retry_interval: QR_RETRY_INTERVAL,
        }
    }
}

/// State published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfQrSnapshot {
    pub artifact: Option<Arc<SelfQr>>,
    pub freshness: QrFreshness,
    pub error: Option<String>,
}

struct ScheduledRefresh {
    id: u64,
    delay: Duration,
    handle: JoinHandle<()>,
}

struct ControllerInner {
    service: Arc<dyn SelfQrServiceTrait>,
    api: Arc<dyn QrApiTrait>,
    config: ControllerConfig,
    state_tx: watch::Sender<SelfQrSnapshot>,
    active: AtomicBool,
    generation: AtomicU64,
    timer_ids: AtomicU64,
    scheduled: Mutex<Option<ScheduledRefresh>>,
}

/// View-model driving the self QR lifecycle.
///
/// Must be used from within a tokio runtime. Dropping the controller
/// deactivates it.
pub struct SelfQrController {
    inner: Arc<ControllerInner>,
}

impl SelfQrController {
    pub fn new(
        service: Arc<dyn SelfQrServiceTrait>,
        api: Arc<dyn QrApiTrait>,
        config: ControllerConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(SelfQrSnapshot::default());
        SelfQrController {
            inner: Arc::new(ControllerInner {
                service,
                api,
                config,
                state_tx,
                active: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                timer_ids: AtomicU64::new(0),
                scheduled: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SelfQrSnapshot> {
        self.inner.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> SelfQrSnapshot {
        self.inner.state_tx.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Delay of the refresh currently waiting to fire.
    pub fn pending_refresh(&self) -> Option<Duration> {
        self.inner.lock_scheduled().as_ref().map(|s| s.delay)
    }

    /// Publishes the persisted QR (if any) and starts refreshing in the background.
    pub async fn activate(&self) {
        if self.inner.active.swap(true, Ordering::SeqCst) {
            debug!("Self QR controller already active");
            return;
        }
        info!("Self QR controller activated");

        let artifact = self.inner.service.get_current().await;
        if !self.is_active() {
            return;
        }
        // Without a persisted copy the state stays LOADING until the first cycle completes.
        let snapshot = match artifact {
            Some(qr) => SelfQrSnapshot {
                freshness: qr.freshness_at(Utc::now()),
                artifact: Some(qr),
                error: None,
            },
            None => SelfQrSnapshot::default(),
        };
        self.inner.publish(snapshot);
        let generation = self.inner.generation.load(Ordering::SeqCst);
        self.inner.schedule(Duration::ZERO, generation);
    }

    /// Runs one refresh cycle now, replacing any scheduled one.
    pub async fn refresh(&self) {
        self.inner.run_cycle().await;
    }

    /// Stops refreshing. A fetch already in flight is discarded when it completes.
    pub fn deactivate(&self) {
        self.inner.deactivate();
    }
}

impl Drop for SelfQrController {
    fn drop(&mut self) {
        self.inner.deactivate();
    }
}

impl ControllerInner {
    fn lock_scheduled(&self) -> MutexGuard<'_, Option<ScheduledRefresh>> {
        self.scheduled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: SelfQrSnapshot) {
        debug!("Self QR state -> {}", snapshot.freshness);
        self.state_tx.send_replace(snapshot);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.active.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn deactivate(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            info!("Self QR controller deactivated");
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_scheduled();
    }

    fn cancel_scheduled(&self) {
        if let Some(previous) = self.lock_scheduled().take() {
            debug!("Cancelling scheduled self QR refresh #{}", previous.id);
            previous.handle.abort();
        }
    }

    /// Removes timer `id` from the slot so the cycle it starts is not aborted
    /// by its own cancellation. False if the timer was replaced meanwhile.
    fn claim_scheduled(&self, id: u64) -> bool {
        let mut slot = self.lock_scheduled();
        if slot.as_ref().map(|s| s.id) == Some(id) {
            slot.take();
            true
        } else {
            false
        }
    }

    /// Schedules the next cycle on behalf of cycle `generation`. Checked under
    /// the slot lock, so a cycle superseded meanwhile never leaves a timer behind.
    fn schedule(self: &Arc<Self>, delay: Duration, generation: u64) {
        let mut slot = self.lock_scheduled();
        if !self.is_current(generation) {
            debug!("Not scheduling for superseded self QR cycle #{}", generation);
            return;
        }
        let id = self.timer_ids.fetch_add(1, Ordering::SeqCst) + 1;
        let this = Arc::clone(self);

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if this.claim_scheduled(id) {
                this.run_cycle().await;
            }
        });
        debug!("Scheduled self QR refresh #{} in {:?}", id, delay);
        if let Some(previous) = slot.replace(ScheduledRefresh { id, delay, handle }) {
            previous.handle.abort();
        }
    }

    async fn run_cycle(self: &Arc<Self>) {
        if !self.active.load(Ordering::SeqCst) {
            debug!("Self QR refresh skipped: controller inactive");
            return;
        }
        // Bump before cancelling: a superseded cycle then fails the check in schedule().
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_scheduled();

        self.state_tx.send_modify(|state| {
            state.freshness = QrFreshness::Loading;
            state.error = None;
        });

        let result = self.api.fetch_self_qr().await;
        if !self.is_current(generation) {
            debug!("Discarding superseded self QR fetch #{}", generation);
            return;
        }

        match result {
            Ok(payload) => {
                let artifact = self.service.set_from_fetch(payload).await;
                if !self.is_current(generation) {
                    return;
                }
                let freshness = artifact.freshness_at(Utc::now());
                self.publish(SelfQrSnapshot {
                    artifact: Some(artifact),
                    freshness,
                    error: None,
                });
                self.schedule(self.config.refresh_interval, generation);
            }
            Err(e) => {
                warn!("Self QR fetch failed: {}", e);
                let freshness = if e.is_not_verified() {
                    QrFreshness::NotVerified
                } else {
                    self.service.current_freshness()
                };
                let mut snapshot = self.state_tx.borrow().clone();
                snapshot.freshness = freshness;
                snapshot.error = Some(e.to_string());
                self.publish(snapshot);
                self.schedule(self.config.retry_interval, generation);
            }
        }
    }
}
