pub mod health;
pub mod market;
pub mod params;
pub mod signals;

use crate::AppState;
use axum::Router;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(market::router())
        .merge(signals::router())
}
