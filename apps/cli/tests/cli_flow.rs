use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde_json::json;
use tempfile::tempdir;

use qrpass_cli::config::{Config, ENV_DB_PATH, ENV_LOCALE};
use qrpass_cli::{build_context, qr_cmd, tags_cmd, AppContext};
use qrpass_core::constants::TAG_MAP_STORAGE_KEY;
use qrpass_core::errors::Error;
use qrpass_core::qr::{QrFreshness, QrImage, QrPayloadData, RawQrPayload, SelfQrServiceTrait};
use qrpass_core::storage::KeyValueStoreTrait;
use qrpass_core::RiskCode;

async fn build_test_context(db_path: &std::path::Path) -> AppContext {
    let db_path = db_path.to_string_lossy().to_string();
    let config = Config::from_lookup(|key| match key {
        k if k == ENV_DB_PATH => Some(db_path.clone()),
        k if k == ENV_LOCALE => Some("en".to_string()),
        _ => None,
    })
    .unwrap();
    build_context(config).await.unwrap()
}

fn token(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"ES256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.c2lnbmF0dXJl", header, payload)
}

#[tokio::test]
async fn offline_commands_without_access_token() {
    let tmp = tempdir().unwrap();
    let ctx = build_test_context(&tmp.path().join("data").join("qrpass.db")).await;

    let view = qr_cmd::show_view(&ctx, false).await.unwrap();
    assert_eq!(view.freshness, QrFreshness::Failed);
    assert!(view.qr.is_none());

    let err = qr_cmd::show_view(&ctx, true).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MissingConfigKey(_))
    ));
    assert!(tags_cmd::refresh(&ctx).await.is_err());

    let scanned = qr_cmd::scan_view(
        &ctx,
        &token(json!({"_": ["anon-7", "O", "A1"], "iat": 1_700_000_000, "iss": "qrpass"})),
    )
    .await
    .unwrap();
    assert_eq!(scanned.summary.anonymous_id, "anon-7");
    assert_eq!(scanned.summary.risk.code, RiskCode::Orange);
    assert_eq!(scanned.summary.risk.label, Some("Moderate risk"));
    assert_eq!(scanned.tag_code.as_deref(), Some("A1"));
    assert_eq!(scanned.summary.tag_label, None);
    assert_eq!(scanned.claimed_onset_date, None);

    assert!(tags_cmd::lookup(&ctx, "A1").await.is_err());
    assert!(qr_cmd::scan_view(&ctx, "not-a-token").await.is_err());
}

#[tokio::test]
async fn cached_tag_map_resolves_labels() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("qrpass.db");

    {
        let ctx = build_test_context(&db_path).await;
        ctx.store
            .set_item(
                TAG_MAP_STORAGE_KEY,
                r#"[{"name":"contact","code":"A1","label":"Close contact"}]"#,
            )
            .await
            .unwrap();
    }

    let ctx = build_test_context(&db_path).await;
    assert_eq!(tags_cmd::lookup(&ctx, "A1").await.unwrap(), "Close contact");
    assert!(tags_cmd::lookup(&ctx, "ZZ").await.is_err());

    let scanned = qr_cmd::scan_view(
        &ctx,
        &token(json!({"_": ["anon-8", "green", "A1", 2], "iat": 1_700_000_000})),
    )
    .await
    .unwrap();
    assert_eq!(scanned.summary.tag_label.as_deref(), Some("Close contact"));
    assert!(scanned.claimed_onset_date.is_some());
}

#[tokio::test]
async fn self_qr_survives_restart() {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("qrpass.db");

    let issued_at = {
        let ctx = build_test_context(&db_path).await;
        let qr = ctx
            .self_qr_service
            .set_from_fetch(RawQrPayload {
                data: QrPayloadData {
                    anonymous_id: "anon-self".to_string(),
                    code: RiskCode::Yellow,
                    tag: None,
                },
                qr: QrImage {
                    mime_type: "image/png".to_string(),
                    base64: "AAAA".to_string(),
                },
            })
            .await;
        qr.issued_at()
    };

    let ctx = build_test_context(&db_path).await;
    let view = qr_cmd::show_view(&ctx, false).await.unwrap();
    assert_eq!(view.freshness, QrFreshness::Normal);
    let qr = view.qr.unwrap();
    assert_eq!(qr.summary.anonymous_id, "anon-self");
    assert_eq!(qr.summary.risk.score, Some(80));
    assert_eq!(qr.issued_at, issued_at);
    assert_eq!(qr.summary.tag_label, None);
}
