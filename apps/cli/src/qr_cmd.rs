//! Self QR and scan subcommands.
//!
//! User-facing output is JSON on stdout; diagnostics go through tracing.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use qrpass_core::qr::{
    QrApiTrait, QrFreshness, ScannedQr, SelfQrController, SelfQrServiceTrait, SelfQrSnapshot,
};
use qrpass_core::tags::TagCacheTrait;
use qrpass_core::utils::time_utils::display_date_today;

use crate::main_lib::AppContext;
use crate::views::{ScannedQrView, SelfQrView};

/// How often `watch` re-derives freshness from the held QR's age.
const FRESHNESS_TICK: Duration = Duration::from_secs(15);

pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    let mut out = io::stdout().lock();
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Current self QR as held locally, optionally fetching a fresh one first.
pub async fn show_view(ctx: &AppContext, refresh: bool) -> anyhow::Result<SelfQrView> {
    let service = &ctx.self_qr_service;
    let snapshot = if refresh {
        let api = ctx.api()?;
        let payload = api.fetch_self_qr().await?;
        let artifact = service.set_from_fetch(payload).await;
        SelfQrSnapshot {
            freshness: artifact.freshness_at(chrono::Utc::now()),
            artifact: Some(artifact),
            error: None,
        }
    } else {
        let artifact = service.get_current().await;
        SelfQrSnapshot {
            freshness: service.current_freshness(),
            artifact,
            error: None,
        }
    };
    Ok(SelfQrView::from_snapshot(
        &snapshot,
        ctx.tag_cache.as_ref(),
        ctx.config.locale,
    ))
}

pub async fn show(ctx: &AppContext, refresh: bool) -> anyhow::Result<()> {
    let view = show_view(ctx, refresh).await?;
    print_json(&view, true)
}

/// Decodes a scanned token against the cached tag map.
pub async fn scan_view(ctx: &AppContext, token: &str) -> anyhow::Result<ScannedQrView> {
    ctx.tag_cache.initialize().await;
    let scanned = ScannedQr::from_token(token)?;
    Ok(ScannedQrView::new(
        scanned,
        ctx.tag_cache.as_ref(),
        display_date_today(),
        ctx.config.locale,
    ))
}

pub async fn scan(ctx: &AppContext, token: &str) -> anyhow::Result<()> {
    let view = scan_view(ctx, token).await?;
    print_json(&view, true)
}

/// Runs the refresh controller and prints one JSON line per state change
/// until interrupted.
pub async fn watch(ctx: &AppContext) -> anyhow::Result<()> {
    let api = ctx.api()?;
    let controller = SelfQrController::new(
        ctx.self_qr_service.clone(),
        api,
        ctx.config.controller_config(),
    );
    let locale = ctx.config.locale;
    let tags = ctx.tag_cache.as_ref();
    let mut states = controller.subscribe();
    let mut ticker = tokio::time::interval(FRESHNESS_TICK);
    ticker.tick().await;

    controller.activate().await;
    let mut last = SelfQrView::from_snapshot(&states.borrow_and_update().clone(), tags, locale);
    print_json(&last, false)?;

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        let mut snapshot = tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                states.borrow_and_update().clone()
            }
            _ = ticker.tick() => controller.snapshot(),
            result = &mut interrupted => {
                if let Err(e) = result {
                    warn!("Failed to listen for Ctrl-C: {}", e);
                }
                info!("Interrupted, stopping self QR refresh");
                break;
            }
        };

        // The controller only classifies age when a cycle completes.
        if let (Some(qr), QrFreshness::Normal | QrFreshness::Outdate | QrFreshness::Expire) =
            (&snapshot.artifact, snapshot.freshness)
        {
            snapshot.freshness = qr.freshness_at(chrono::Utc::now());
        }

        let view = SelfQrView::from_snapshot(&snapshot, tags, locale);
        if view != last {
            print_json(&view, false)?;
            last = view;
        }
    }

    controller.deactivate();
    Ok(())
}
