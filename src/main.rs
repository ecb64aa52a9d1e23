use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod seed;
mod services;

use services::{
    AppState,
    auth_service::AuthService,
    entity_store::EntityStore,
    export_service::{LogExporter, RegistrationExporter, WebhookExporter},
    stats_service::StatsService,
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + reset flag ---
    let (cfg, reset_stats) = config::AppConfig::from_env_and_args()?;

    tracing::info!(
        host = %cfg.host,
        port = cfg.port,
        stats_path = %cfg.stats_path,
        demo_content = cfg.seed_demo_content,
        "Starting linkmydrives"
    );

    let stats = StatsService::new(&cfg.stats_path);

    // --- Handle reset mode ---
    if reset_stats {
        stats.reset().await?;
        tracing::info!("Stats document reset.");
        return Ok(()); // exit after reset
    }

    // Make sure the document exists before the first request.
    stats.get_stats().await?;

    // --- Seed the in-memory store ---
    let store = Arc::new(EntityStore::new());
    seed::demo_user(&store).await?;
    if cfg.seed_demo_content {
        seed::demo_content(&store).await?;
    }

    let exporter: Arc<dyn RegistrationExporter> = match &cfg.export_webhook {
        Some(url) => {
            tracing::info!("Exporting preregistrations to {}", url);
            Arc::new(WebhookExporter::new(url.clone()))
        }
        None => {
            tracing::info!("No export webhook configured; preregistrations go to the log");
            Arc::new(LogExporter)
        }
    };

    let auth = AuthService::new(store.clone(), cfg.jwt_secret.clone(), cfg.token_ttl_secs);
    let state = AppState::new(store, stats, auth, exporter);

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
