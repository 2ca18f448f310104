//! `fanout-server` — server mode: an axum surface that triggers configured
//! actions over HTTP and returns their results as JSON.

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use fanout_core::{Engine, Registry};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(registry: Arc<Registry>, engine: Engine) -> Router {
    let app_state = state::AppState::new(registry, engine);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        .route("/api/config", get(routes::config::get_config))
        .route("/api/actions", get(routes::actions::list_actions))
        .route("/api/actions/{name}", get(routes::actions::get_action))
        .route("/api/actions/{name}", post(routes::actions::run_action))
        .route("/api/invoke", post(routes::invoke::invoke_ad_hoc))
        .layer(cors)
        .with_state(app_state)
}

/// Start the action server on a pre-bound listener.
///
/// Accepting a `TcpListener` lets the caller read the actual port before
/// starting (useful when `port = 0` and the OS picks a free one).
pub async fn serve_on(
    registry: Arc<Registry>,
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    let app = build_router(registry, engine);

    tracing::info!("fanout action server listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
