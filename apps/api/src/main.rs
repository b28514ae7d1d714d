mod admin;
mod auth;
mod config;
mod db;
mod errors;
mod export;
mod feedback;
mod forms;
mod models;
mod remote;
mod routes;
mod state;
mod storage;
mod sync;
mod wizard;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::connect_remote;
use crate::export::layout::PageConfig;
use crate::remote::RemoteStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{MemoryStoreProvider, RedisStoreProvider, StoreProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Key-value store: Redis when configured, otherwise process memory
    let stores: Arc<dyn StoreProvider> = match &config.redis_url {
        Some(url) => Arc::new(RedisStoreProvider::connect(url, &config.store_namespace).await?),
        None => {
            warn!("REDIS_URL not set, drafts are kept in memory only");
            Arc::new(MemoryStoreProvider::new())
        }
    };

    // Remote sync: optional, and a failed connection only disables it
    let remote: Option<Arc<dyn RemoteStore>> = match &config.database_url {
        Some(url) => match connect_remote(url).await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                warn!(error = %e, "Remote store unavailable, continuing in local-only mode");
                None
            }
        },
        None => {
            info!("DATABASE_URL not set, remote sync disabled");
            None
        }
    };

    let page_config = PageConfig::default();
    info!(
        "Export page: {}x{}pt, margin {}pt",
        page_config.width_pt, page_config.height_pt, page_config.margin_pt
    );

    let state = AppState {
        stores,
        remote,
        config: config.clone(),
        page_config,
        shared_lock: Arc::new(Mutex::new(())),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
