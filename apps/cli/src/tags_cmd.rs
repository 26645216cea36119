//! Tag map subcommands.

use clap::Subcommand;
use serde::Serialize;

use qrpass_core::tags::{TagCacheTrait, TagLoadState};

use crate::main_lib::AppContext;
use crate::qr_cmd::print_json;

/// Tag subcommand actions.
#[derive(Subcommand, Debug)]
pub enum TagsAction {
    /// Download the tag map and replace the cached copy
    Refresh,
    /// Print the label cached for a tag code
    Lookup {
        /// Tag code as carried in a scanned QR
        code: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshSummary {
    tag_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupResult<'a> {
    code: &'a str,
    label: String,
}

/// Execute a tags subcommand.
pub async fn run(ctx: &AppContext, action: TagsAction) -> anyhow::Result<()> {
    match action {
        TagsAction::Refresh => {
            let tag_count = refresh(ctx).await?;
            print_json(&RefreshSummary { tag_count }, true)
        }
        TagsAction::Lookup { code } => {
            let label = lookup(ctx, &code).await?;
            print_json(
                &LookupResult {
                    code: &code,
                    label,
                },
                true,
            )
        }
    }
}

/// Fetches and persists the tag map, returning how many entries it holds.
pub async fn refresh(ctx: &AppContext) -> anyhow::Result<usize> {
    ctx.api()?;
    ctx.tag_cache.initialize().await;
    ctx.tag_cache.refresh().await?;
    Ok(ctx.tag_cache.tags().map(|tags| tags.len()).unwrap_or(0))
}

pub async fn lookup(ctx: &AppContext, code: &str) -> anyhow::Result<String> {
    if ctx.tag_cache.initialize().await == TagLoadState::NotLoaded {
        anyhow::bail!("No tag map cached yet; run `qrpass tags refresh` first");
    }
    ctx.tag_cache
        .label_for(code)
        .ok_or_else(|| anyhow::anyhow!("Unknown tag code '{}'", code))
}
