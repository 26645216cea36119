//! JSON views printed by the commands.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;

use qrpass_core::qr::{QrFreshness, QrView, ScannedQr, SelfQr, SelfQrSnapshot};
use qrpass_core::tags::TagCacheTrait;
use qrpass_core::utils::time_utils::format_display_date;
use qrpass_core::{Locale, QrDisplay};

/// Fields every displayed QR shares, own or scanned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrSummary {
    pub anonymous_id: String,
    pub risk: QrDisplay,
    pub tag_label: Option<String>,
    pub created_date: Option<String>,
}

impl QrSummary {
    pub fn new(qr: &QrView, tags: &dyn TagCacheTrait, locale: Locale) -> Self {
        QrSummary {
            anonymous_id: qr.anonymous_id().to_string(),
            risk: QrDisplay::from_risk(qr, locale),
            tag_label: qr.tag_label(tags),
            created_date: qr.created_date(locale),
        }
    }
}

/// Self QR state as the presentation layer would render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfQrView {
    pub freshness: QrFreshness,
    pub error: Option<String>,
    pub qr: Option<SelfQrDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfQrDetails {
    #[serde(flatten)]
    pub summary: QrSummary,
    pub issued_at: DateTime<Utc>,
    pub image_url: String,
}

impl SelfQrView {
    pub fn from_snapshot(
        snapshot: &SelfQrSnapshot,
        tags: &dyn TagCacheTrait,
        locale: Locale,
    ) -> Self {
        SelfQrView {
            freshness: snapshot.freshness,
            error: snapshot.error.clone(),
            qr: snapshot
                .artifact
                .as_ref()
                .map(|qr| SelfQrDetails::new(Arc::clone(qr), tags, locale)),
        }
    }
}

impl SelfQrDetails {
    pub fn new(qr: Arc<SelfQr>, tags: &dyn TagCacheTrait, locale: Locale) -> Self {
        let issued_at = qr.issued_at();
        let image_url = qr.image_url();
        SelfQrDetails {
            summary: QrSummary::new(&QrView::from(qr), tags, locale),
            issued_at,
            image_url,
        }
    }
}

/// Decoded view of another person's QR.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScannedQrView {
    #[serde(flatten)]
    pub summary: QrSummary,
    pub issuer: String,
    pub tag_code: Option<String>,
    pub claimed_onset_date: Option<String>,
}

impl ScannedQrView {
    /// `today` anchors the claimed onset date; callers pass the display-zone date.
    pub fn new(
        scanned: ScannedQr,
        tags: &dyn TagCacheTrait,
        today: NaiveDate,
        locale: Locale,
    ) -> Self {
        let issuer = scanned.issuer().to_string();
        let tag_code = scanned.tag_code().map(str::to_string);
        let claimed_onset_date = scanned
            .claimed_onset_date_from(today)
            .map(|date| format_display_date(date, locale));
        ScannedQrView {
            summary: QrSummary::new(&QrView::from(scanned), tags, locale),
            issuer,
            tag_code,
            claimed_onset_date,
        }
    }
}
