//! Augur - market data and quarterly trading signal server

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

use axum::response::{IntoResponse, Response};
use axum::Router;
use config::Config;
use error::AppError;
use sources::MarketDataSource;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market_data: Arc<dyn MarketDataSource>,
}

impl AppState {
    pub fn new(config: Config, market_data: Arc<dyn MarketDataSource>) -> Self {
        Self {
            config: Arc::new(config),
            market_data,
        }
    }
}

/// A panicking handler still answers with the uniform error body.
fn handle_panic(_: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    AppError::Internal("Internal server error".to_string()).into_response()
}

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
