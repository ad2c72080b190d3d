//! Market data API endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use super::params::{RangeQuery, SymbolRangeQuery};
use crate::error::{AppError, Result};
use crate::services::MarketService;
use crate::types::{ClosePrices, CumulativeMovement, RangeRequest, SignalRequest};
use crate::AppState;

/// Create the market router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/get_nyse_data", get(get_nyse_data))
        .route("/get_cumulative_movement", get(get_cumulative_movement))
}

/// Daily closes of the configured index, keyed by date.
async fn get_nyse_data(
    State(state): State<AppState>,
    query: std::result::Result<Query<RangeQuery>, QueryRejection>,
) -> Result<Json<ClosePrices>> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let range = RangeRequest::try_from(query)?;

    let service = MarketService::new(state.market_data.clone());
    let closes = service
        .index_closes(&state.config.index_symbol, range)
        .await?;

    Ok(Json(closes))
}

/// Per-date sum of closes across the requested symbols.
async fn get_cumulative_movement(
    State(state): State<AppState>,
    query: std::result::Result<Query<SymbolRangeQuery>, QueryRejection>,
) -> Result<Json<CumulativeMovement>> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = SignalRequest::try_from(query)?;

    let service = MarketService::new(state.market_data.clone());
    let movement = service.cumulative_movement(&request).await?;

    Ok(Json(movement))
}
