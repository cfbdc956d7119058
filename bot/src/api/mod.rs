//! API Router and Application State
//!
//! Central routing configuration and shared state.

pub mod error;
pub mod interactions;
pub mod signature;

use std::sync::Arc;

use axum::{extract::State, middleware::from_fn_with_state, routing::get, routing::post, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::{config::Config, friendcode::Stores, ratelimit::RateLimiter};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Friend code and preference stores
    pub stores: Stores,
    /// Bot configuration
    pub config: Arc<Config>,
    /// Rate limiter (optional, uses Redis)
    pub rate_limiter: Option<RateLimiter>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(stores: Stores, config: Config, rate_limiter: Option<RateLimiter>) -> Self {
        Self {
            stores,
            config: Arc::new(config),
            rate_limiter,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let interaction_routes = Router::new()
        .route("/interactions", post(interactions::handle_interaction))
        .layer(from_fn_with_state(state.clone(), signature::require_signature));

    Router::new()
        .route("/health", get(health_check))
        .merge(interaction_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Crate version
    version: &'static str,
    /// Whether rate limiting is enabled
    rate_limiting: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        rate_limiting: state.rate_limiter.is_some(),
    })
}
