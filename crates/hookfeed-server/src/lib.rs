pub mod api;
pub mod config;
pub mod error;
pub mod event_store;
pub mod health;
pub mod state;
pub mod webhooks;

use axum::Router;
use tower_http::cors::CorsLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let state = AppState::new(config);

    let webhook_routes = Router::new()
        .route(
            "/receiver",
            axum::routing::post(webhooks::github::receiver),
        )
        .route(
            "/notifications",
            axum::routing::get(api::get_notifications),
        );

    let app = Router::new()
        .route("/health", axum::routing::get(health::health_check))
        .nest("/webhook", webhook_routes)
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    (app, state)
}
