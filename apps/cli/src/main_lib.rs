use std::sync::Arc;

use async_trait::async_trait;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qrpass_connect::QrApiClient;
use qrpass_core::errors::{Error, Result};
use qrpass_core::qr::{QrApiTrait, RawQrPayload, SelfQrService};
use qrpass_core::storage::KeyValueStoreTrait;
use qrpass_core::tags::{TagApiTrait, TagCache, TagMap};
use qrpass_storage_sqlite::{create_pool, db, run_migrations, spawn_writer, KeyValueRepository};

use crate::config::{Config, LogFormat, ENV_ACCESS_TOKEN};

/// Services shared by every command.
pub struct AppContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStoreTrait>,
    pub self_qr_service: Arc<SelfQrService>,
    pub tag_cache: Arc<TagCache>,
    api: Option<Arc<QrApiClient>>,
}

impl AppContext {
    /// The HTTP client, or `MissingConfigKey` when no access token is configured.
    pub fn api(&self) -> Result<Arc<QrApiClient>> {
        self.api
            .clone()
            .ok_or_else(|| Error::MissingConfigKey(ENV_ACCESS_TOKEN.to_string()))
    }
}

/// Stand-in network source used when no access token is configured.
struct MissingTokenApi;

#[async_trait]
impl QrApiTrait for MissingTokenApi {
    async fn fetch_self_qr(&self) -> Result<RawQrPayload> {
        Err(Error::MissingConfigKey(ENV_ACCESS_TOKEN.to_string()))
    }
}

#[async_trait]
impl TagApiTrait for MissingTokenApi {
    async fn fetch_tag_map(&self) -> Result<TagMap> {
        Err(Error::MissingConfigKey(ENV_ACCESS_TOKEN.to_string()))
    }
}

/// Logs go to stderr so stdout stays clean JSON.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Opens the database, runs migrations and wires the core services.
///
/// Must be called from within a tokio runtime (the writer actor is spawned here).
pub async fn build_context(config: Config) -> anyhow::Result<AppContext> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());
    let store: Arc<dyn KeyValueStoreTrait> =
        Arc::new(KeyValueRepository::new(Arc::clone(&pool), writer));

    let api = match config.access_token.as_deref() {
        Some(token) => Some(Arc::new(QrApiClient::new(&config.api_url, token)?)),
        None => {
            tracing::debug!("No access token configured; network commands are unavailable");
            None
        }
    };
    let tag_api: Arc<dyn TagApiTrait> = match &api {
        Some(client) => client.clone() as Arc<dyn TagApiTrait>,
        None => Arc::new(MissingTokenApi) as Arc<dyn TagApiTrait>,
    };

    let self_qr_service = Arc::new(SelfQrService::new(store.clone()));
    let tag_cache = Arc::new(TagCache::new(store.clone(), tag_api));

    Ok(AppContext {
        config,
        store,
        self_qr_service,
        tag_cache,
        api,
    })
}
