use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use super::risk_constants::*;
use crate::locale::Locale;

/// Risk marker carried by a QR.
///
/// Ordered from lowest to highest severity: Green < Yellow < Orange < Red.
/// `Unknown` covers anything outside the known set and sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum RiskCode {
    #[default]
    Unknown,
    Green,
    Yellow,
    Orange,
    Red,
}

impl RiskCode {
    /// Parses a risk code, accepting full names and the single-letter
    /// compact form used in scanned tokens. Never fails.
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "green" | "g" => RiskCode::Green,
            "yellow" | "y" => RiskCode::Yellow,
            "orange" | "o" => RiskCode::Orange,
            "red" | "r" => RiskCode::Red,
            _ => RiskCode::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCode::Green => "green",
            RiskCode::Yellow => "yellow",
            RiskCode::Orange => "orange",
            RiskCode::Red => "red",
            RiskCode::Unknown => "unknown",
        }
    }
}

impl FromStr for RiskCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RiskCode::from_code(s))
    }
}

impl std::fmt::Display for RiskCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RiskCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RiskCode::from_code(&raw))
    }
}

// =============================================================================
// Risk tables
// =============================================================================

pub fn color_of(code: RiskCode) -> &'static str {
    match code {
        RiskCode::Green => COLOR_GREEN,
        RiskCode::Yellow => COLOR_YELLOW,
        RiskCode::Orange => COLOR_ORANGE,
        RiskCode::Red => COLOR_RED,
        RiskCode::Unknown => COLOR_DEFAULT,
    }
}

/// Severity level, 1 (green) to 4 (red).
pub fn level_of(code: RiskCode) -> Option<u8> {
    match code {
        RiskCode::Green => Some(1),
        RiskCode::Yellow => Some(2),
        RiskCode::Orange => Some(3),
        RiskCode::Red => Some(4),
        RiskCode::Unknown => None,
    }
}

/// Score shown on the card, 100 (green) down to 30 (red).
pub fn score_of(code: RiskCode) -> Option<u8> {
    match code {
        RiskCode::Green => Some(100),
        RiskCode::Yellow => Some(80),
        RiskCode::Orange => Some(50),
        RiskCode::Red => Some(30),
        RiskCode::Unknown => None,
    }
}

/// Label in the default (Thai) locale.
pub fn label_of(code: RiskCode) -> Option<&'static str> {
    label_of_locale(code, Locale::default())
}

pub fn label_of_locale(code: RiskCode, locale: Locale) -> Option<&'static str> {
    let label = match (locale, code) {
        (_, RiskCode::Unknown) => return None,
        (Locale::Th, RiskCode::Green) => "ความเสี่ยงน้อยมาก",
        (Locale::Th, RiskCode::Yellow) => "ความเสี่ยงน้อย",
        (Locale::Th, RiskCode::Orange) => "ความเสี่ยงปานกลาง",
        (Locale::Th, RiskCode::Red) => "ความเสี่ยงมาก",
        (Locale::En, RiskCode::Green) => "Very low risk",
        (Locale::En, RiskCode::Yellow) => "Low risk",
        (Locale::En, RiskCode::Orange) => "Moderate risk",
        (Locale::En, RiskCode::Red) => "High risk",
    };
    Some(label)
}
