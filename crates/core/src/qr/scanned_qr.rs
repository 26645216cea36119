use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::self_qr::SelfQr;
use super::token::decode_token;
use crate::errors::Result;
use crate::locale::Locale;
use crate::risk::{RiskCode, RiskDisplay};
use crate::tags::TagCacheTrait;
use crate::utils::time_utils::{
    days_before, display_date_today, format_display_datetime, from_epoch_seconds,
};

/// Fields carried by another user's QR token.
///
/// The fields are taken as-is from the decoded token; nothing here verifies
/// who issued it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    pub anonymous_id: String,
    pub risk_code: RiskCode,
    #[serde(default)]
    pub tag_code: Option<String>,
    #[serde(default)]
    pub age_in_days: Option<i64>,
    pub issued_at_epoch_seconds: i64,
    #[serde(default)]
    pub issuer: String,
}

/// View over one scanned token. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedQr {
    payload: DecodedPayload,
}

impl ScannedQr {
    pub fn new(payload: DecodedPayload) -> Self {
        ScannedQr { payload }
    }

    pub fn from_token(token: &str) -> Result<Self> {
        decode_token(token).map(ScannedQr::new)
    }

    pub fn payload(&self) -> &DecodedPayload {
        &self.payload
    }

    pub fn anonymous_id(&self) -> &str {
        &self.payload.anonymous_id
    }

    pub fn issuer(&self) -> &str {
        &self.payload.issuer
    }

    pub fn tag_code(&self) -> Option<&str> {
        self.payload.tag_code.as_deref()
    }

    /// Date the holder claims symptoms started, counted back from today.
    pub fn claimed_onset_date(&self) -> Option<NaiveDate> {
        self.claimed_onset_date_from(display_date_today())
    }

    /// Negative ages are treated as absent.
    pub fn claimed_onset_date_from(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self.payload.age_in_days {
            Some(days) if days >= 0 => days_before(today, days),
            _ => None,
        }
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        from_epoch_seconds(self.payload.issued_at_epoch_seconds)
    }

    pub fn created_date(&self, locale: Locale) -> Option<String> {
        self.created_at()
            .map(|instant| format_display_datetime(&instant, locale))
    }

    pub fn tag_label(&self, tags: &dyn TagCacheTrait) -> Option<String> {
        self.tag_code().and_then(|code| tags.label_for(code))
    }
}

impl RiskDisplay for ScannedQr {
    fn risk_code(&self) -> RiskCode {
        self.payload.risk_code
    }
}

// =============================================================================
// QrView
// =============================================================================

/// Any QR the app can display: the owner's own or a scanned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrView {
    SelfArtifact(Arc<SelfQr>),
    Scanned(ScannedQr),
}

impl QrView {
    pub fn anonymous_id(&self) -> &str {
        match self {
            QrView::SelfArtifact(qr) => qr.anonymous_id(),
            QrView::Scanned(qr) => qr.anonymous_id(),
        }
    }

    pub fn created_date(&self, locale: Locale) -> Option<String> {
        match self {
            QrView::SelfArtifact(qr) => Some(qr.created_date(locale)),
            QrView::Scanned(qr) => qr.created_date(locale),
        }
    }

    /// Self QRs carry their tag title; scanned ones resolve through the cache.
    pub fn tag_label(&self, tags: &dyn TagCacheTrait) -> Option<String> {
        match self {
            QrView::SelfArtifact(qr) => qr.tag_label().map(str::to_string),
            QrView::Scanned(qr) => qr.tag_label(tags),
        }
    }
}

impl RiskDisplay for QrView {
    fn risk_code(&self) -> RiskCode {
        match self {
            QrView::SelfArtifact(qr) => qr.risk_code(),
            QrView::Scanned(qr) => qr.risk_code(),
        }
    }
}

impl From<ScannedQr> for QrView {
    fn from(qr: ScannedQr) -> Self {
        QrView::Scanned(qr)
    }
}

impl From<Arc<SelfQr>> for QrView {
    fn from(qr: Arc<SelfQr>) -> Self {
        QrView::SelfArtifact(qr)
    }
}
