use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::qr_model::{QrFreshness, QrImage, QrTag, RawQrPayload};
use crate::locale::Locale;
use crate::risk::{RiskCode, RiskDisplay};
use crate::utils::time_utils::format_display_datetime;

/// The device owner's current QR.
///
/// `issued_at` is stamped locally when the payload is received; it is part of
/// the persisted form so freshness survives a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfQr {
    issued_at: DateTime<Utc>,
    payload: RawQrPayload,
}

impl SelfQr {
    pub fn new(payload: RawQrPayload, issued_at: DateTime<Utc>) -> Self {
        SelfQr { issued_at, payload }
    }

    pub fn payload(&self) -> &RawQrPayload {
        &self.payload
    }

    pub fn anonymous_id(&self) -> &str {
        &self.payload.data.anonymous_id
    }

    pub fn tag(&self) -> Option<&QrTag> {
        self.payload.data.tag.as_ref()
    }

    pub fn tag_label(&self) -> Option<&str> {
        self.tag().map(|tag| tag.title.as_str())
    }

    pub fn image(&self) -> &QrImage {
        &self.payload.qr
    }

    pub fn image_url(&self) -> String {
        self.payload.qr.data_url()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn created_date(&self, locale: Locale) -> String {
        format_display_datetime(&self.issued_at, locale)
    }

    pub fn freshness_at(&self, now: DateTime<Utc>) -> QrFreshness {
        QrFreshness::from_issued_at(self.issued_at, now)
    }
}

impl RiskDisplay for SelfQr {
    fn risk_code(&self) -> RiskCode {
        self.payload.data.code
    }
}
