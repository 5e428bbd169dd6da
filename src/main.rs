use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pdf_vault::{
    config::app::AppConfig,
    csrf::redis_store::RedisTokenStore,
    telemetry,
    web::{router::build_router, state::AppState, upload::local_storage::LocalFileStorage},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = AppConfig::from_env().context("invalid configuration")?;
    telemetry::init(&cfg.log).context("failed to install tracing subscriber")?;
    info!(env = %cfg.app_env, "starting pdf-vault");

    let store = RedisTokenStore::connect(&cfg.redis)
        .await
        .context("failed to connect to token store")?;
    let storage = LocalFileStorage::new(&cfg.upload.root);
    let state = AppState::new(&cfg.csrf, Arc::new(store), Arc::new(storage))
        .context("failed to initialise token binder")?;

    let app = build_router(state, cfg.http.max_body_bytes);
    let listener = tokio::net::TcpListener::bind(cfg.http.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.http.bind))?;
    info!(addr = %cfg.http.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
}
