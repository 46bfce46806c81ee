//! airrank-engine library - airline reliability ranking engine
//!
//! Owns filter, sort and dataset state for the on-time rankings table and
//! exposes the projected view over HTTP.

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod cascade;
pub mod controller;
pub mod filters;
pub mod projector;
pub mod refresh;
pub mod sort;
pub mod source;

use controller::RankingController;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<RankingController>,
}

impl AppState {
    /// Create new application state
    pub fn new(controller: Arc<RankingController>) -> Self {
        Self { controller }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/view", get(api::get_view))
        .route("/api/commands", post(api::post_command))
        .route("/api/destinations/options", get(api::get_destination_options))
        .route("/api/airlines/:code/flights", get(api::get_airline_flights))
        .route("/api/events", get(api::event_stream));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
