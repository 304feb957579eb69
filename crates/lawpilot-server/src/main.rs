mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use lawpilot_core::{config::Config, flow::Invoker};
use lawpilot_genai::GoogleAiBackend;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!(model = %config.model, "starting lawpilot server");

    let backend = Arc::new(GoogleAiBackend::from_config(&config));
    let state = Arc::new(AppState {
        invoker: Invoker::new(backend),
    });

    let app = Router::new()
        // Health
        .route("/api/health", get(routes::health))
        // Flows
        .route("/api/flows/headnote", post(routes::headnote))
        .route("/api/flows/compliance", post(routes::compliance))
        .route("/api/flows/database", post(routes::database))
        .route("/api/flows/drafting", post(routes::drafting))
        .route("/api/flows/news", post(routes::news))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.web_bind, config.web_port);
    info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
