pub mod auth;
pub mod cors;
pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::{Config, ServerConfig},
    llm::GeminiClient,
};
use axum::{Router, extract::DefaultBodyLimit, routing::any};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

pub use handlers::AppState;

/// Builds the router serving both meal endpoints.
///
/// Routes accept any method so `OPTIONS` preflights reach the handlers.
/// A request still running at its route's deadline gets `408 Request Timeout`.
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let analyze_deadline = Duration::from_secs(server.timeouts.generate_meal_data_secs);
    let correct_deadline = Duration::from_secs(server.timeouts.correct_meal_item_secs);

    Router::new()
        .route(
            "/generate_meal_data",
            any(handlers::generate_meal_data).layer(TimeoutLayer::new(analyze_deadline)),
        )
        .route(
            "/correct_meal_item",
            any(handlers::correct_meal_item).layer(TimeoutLayer::new(correct_deadline)),
        )
        .layer(DefaultBodyLimit::max(server.max_upload_bytes))
        .layer(cors::allow_any_origin())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let llm = GeminiClient::connect(config.llm.clone()).await?;
    info!(
        provider = ?config.llm.provider,
        model = %config.llm.model,
        endpoint = llm.endpoint(),
        analyze_timeout_secs = config.server.timeouts.generate_meal_data_secs,
        correct_timeout_secs = config.server.timeouts.correct_meal_item_secs,
        "Model client ready"
    );

    let app_state = AppState::new(config.auth.secret_key.as_str(), Arc::new(llm));
    let app = router(app_state, &config.server);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
