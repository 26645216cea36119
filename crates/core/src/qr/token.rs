//! Decoding of scanned QR tokens.
//!
//! A scanned QR holds a compact JWS (`header.payload.signature`) whose payload
//! looks like `{"_": [anonymousId, code, tagCode?, ageInDays?], "iat": .., "iss": ..}`.
//! Only the payload segment is read. The signature is not checked, so every
//! field must be treated as a claim made by whoever produced the token.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use super::scanned_qr::DecodedPayload;
use crate::errors::{Error, Result};
use crate::risk::RiskCode;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(rename = "_")]
    fields: Vec<Value>,
    iat: i64,
    #[serde(default)]
    iss: String,
}

/// Decodes a scanned token into its payload fields.
pub fn decode_token(token: &str) -> Result<DecodedPayload> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(Error::Token(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let bytes = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|e| Error::Token(e.to_string()))?;

    let anonymous_id = claims
        .fields
        .first()
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Token("missing anonymous id".to_string()))?
        .to_string();

    let risk_code = claims
        .fields
        .get(1)
        .and_then(Value::as_str)
        .map(RiskCode::from_code)
        .unwrap_or_default();

    Ok(DecodedPayload {
        anonymous_id,
        risk_code,
        tag_code: claims.fields.get(2).and_then(tag_code_of),
        age_in_days: claims.fields.get(3).and_then(age_of),
        issued_at_epoch_seconds: claims.iat,
        issuer: claims.iss,
    })
}

fn tag_code_of(value: &Value) -> Option<String> {
    match value {
        Value::String(code) if !code.is_empty() => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    }
}

/// Whole days only; `3` and `3.0` are the same age, `2.5` is no age.
fn age_of(value: &Value) -> Option<i64> {
    match value {
        Value::Number(age) => age.as_i64().or_else(|| age.as_f64().and_then(whole_days)),
        Value::String(age) => {
            let age = age.trim();
            age.parse()
                .ok()
                .or_else(|| age.parse::<f64>().ok().and_then(whole_days))
        }
        _ => None,
    }
}

fn whole_days(days: f64) -> Option<i64> {
    if days.is_finite() && days.fract() == 0.0 && days.abs() < i64::MAX as f64 {
        Some(days as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn token_for(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.c2lnbmF0dXJl", header, payload)
    }

    #[test]
    fn test_decode_full_token() {
        let token = token_for(json!({
            "_": ["anon-1", "O", "A1", 3],
            "iat": 1_700_000_000,
            "iss": "qrpass"
        }));

        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded.anonymous_id, "anon-1");
        assert_eq!(decoded.risk_code, RiskCode::Orange);
        assert_eq!(decoded.tag_code.as_deref(), Some("A1"));
        assert_eq!(decoded.age_in_days, Some(3));
        assert_eq!(decoded.issued_at_epoch_seconds, 1_700_000_000);
        assert_eq!(decoded.issuer, "qrpass");
    }

    #[test]
    fn test_decode_minimal_token() {
        let token = token_for(json!({ "_": ["anon-2", "green"], "iat": 10 }));

        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded.risk_code, RiskCode::Green);
        assert_eq!(decoded.tag_code, None);
        assert_eq!(decoded.age_in_days, None);
        assert_eq!(decoded.issuer, "");
    }

    #[test]
    fn test_decode_null_and_numeric_fields() {
        let token = token_for(json!({ "_": ["anon-3", "R", null, "5"], "iat": 10 }));
        let decoded = decode_token(&token).unwrap();
        assert_eq!(decoded.tag_code, None);
        assert_eq!(decoded.age_in_days, Some(5));

        let token = token_for(json!({ "_": ["anon-3", "R", 12], "iat": 10 }));
        assert_eq!(decode_token(&token).unwrap().tag_code.as_deref(), Some("12"));
    }

    #[test]
    fn test_decode_integral_float_age() {
        let token = token_for(json!({ "_": ["anon-6", "G", null, 3.0], "iat": 10 }));
        assert_eq!(decode_token(&token).unwrap().age_in_days, Some(3));

        let token = token_for(json!({ "_": ["anon-6", "G", null, "4.0"], "iat": 10 }));
        assert_eq!(decode_token(&token).unwrap().age_in_days, Some(4));

        let token = token_for(json!({ "_": ["anon-6", "G", null, 2.5], "iat": 10 }));
        assert_eq!(decode_token(&token).unwrap().age_in_days, None);
    }

    #[test]
    fn test_decode_unknown_code() {
        let token = token_for(json!({ "_": ["anon-4", "X"], "iat": 10 }));
        assert_eq!(decode_token(&token).unwrap().risk_code, RiskCode::Unknown);
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        assert!(matches!(decode_token("not-a-token"), Err(Error::Token(_))));
        assert!(matches!(decode_token("a.!!!.c"), Err(Error::Token(_))));

        let no_id = token_for(json!({ "_": [], "iat": 10 }));
        assert!(matches!(decode_token(&no_id), Err(Error::Token(_))));

        let no_iat = token_for(json!({ "_": ["anon-5", "G"] }));
        assert!(matches!(decode_token(&no_iat), Err(Error::Token(_))));
    }
}
