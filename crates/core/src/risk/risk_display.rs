use serde::Serialize;

use super::risk_model::{color_of, label_of_locale, level_of, score_of, RiskCode};
use crate::locale::Locale;

/// Risk-derived display attributes shared by every QR variant.
///
/// Implementors only provide the risk code; everything else comes from the
/// static risk tables.
pub trait RiskDisplay {
    fn risk_code(&self) -> RiskCode;

    fn color(&self) -> &'static str {
        color_of(self.risk_code())
    }

    fn level(&self) -> Option<u8> {
        level_of(self.risk_code())
    }

    fn score(&self) -> Option<u8> {
        score_of(self.risk_code())
    }

    fn label(&self, locale: Locale) -> Option<&'static str> {
        label_of_locale(self.risk_code(), locale)
    }
}

impl RiskDisplay for RiskCode {
    fn risk_code(&self) -> RiskCode {
        *self
    }
}

/// Serializable risk summary handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrDisplay {
    pub code: RiskCode,
    pub color: &'static str,
    pub level: Option<u8>,
    pub score: Option<u8>,
    pub label: Option<&'static str>,
}

impl QrDisplay {
    pub fn from_risk<T: RiskDisplay + ?Sized>(source: &T, locale: Locale) -> Self {
        QrDisplay {
            code: source.risk_code(),
            color: source.color(),
            level: source.level(),
            score: source.score(),
            label: source.label(locale),
        }
    }
}
