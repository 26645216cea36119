//! QR payload models and the freshness classification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{QR_EXPIRE_AFTER_SECS, QR_OUTDATE_AFTER_SECS};
use crate::risk::RiskCode;

/// Self QR payload as returned by the QR endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQrPayload {
    pub data: QrPayloadData,
    pub qr: QrImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayloadData {
    pub anonymous_id: String,
    pub code: RiskCode,
    #[serde(default)]
    pub tag: Option<QrTag>,
}

/// Categorization attached to a self QR by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrTag {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Rendered QR image, base64 encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrImage {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub base64: String,
}

impl QrImage {
    /// `data:` URL the presentation layer can render directly.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

// =============================================================================
// Freshness
// =============================================================================

/// State of the self QR as shown to the user.
///
/// `Normal`, `Outdate` and `Expire` are derived from the artifact's age;
/// the other states come from the refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QrFreshness {
    #[default]
    Loading,
    Normal,
    Outdate,
    Expire,
    Failed,
    NotVerified,
}

impl QrFreshness {
    /// Classifies an artifact by its age. Boundaries belong to the older bucket.
    pub fn from_elapsed(elapsed: Duration) -> Self {
        let seconds = elapsed.num_seconds();
        if seconds < QR_OUTDATE_AFTER_SECS {
            QrFreshness::Normal
        } else if seconds < QR_EXPIRE_AFTER_SECS {
            QrFreshness::Outdate
        } else {
            QrFreshness::Expire
        }
    }

    pub fn from_issued_at(issued_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_elapsed(now.signed_duration_since(issued_at))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QrFreshness::Loading => "LOADING",
            QrFreshness::Normal => "NORMAL",
            QrFreshness::Outdate => "OUTDATE",
            QrFreshness::Expire => "EXPIRE",
            QrFreshness::Failed => "FAILED",
            QrFreshness::NotVerified => "NOT_VERIFIED",
        }
    }
}

impl std::fmt::Display for QrFreshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
