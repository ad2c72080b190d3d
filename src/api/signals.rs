//! Signal API endpoints.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use super::params::SymbolRangeQuery;
use crate::error::{AppError, Result};
use crate::services::signals::{SignalMap, SignalService};
use crate::types::SignalRequest;
use crate::AppState;

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate_signals", get(generate_signals))
}

/// Quarterly Buy/Hold/Sell signals for each requested symbol.
///
/// Any failure, for any symbol, aborts the whole request with a 400.
async fn generate_signals(
    State(state): State<AppState>,
    query: std::result::Result<Query<SymbolRangeQuery>, QueryRejection>,
) -> Result<Json<SignalMap>> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    let request = SignalRequest::try_from(query)?;

    let service = SignalService::new(state.market_data.clone(), &state.config.signals);
    let signals = service.generate(&request).await?;

    Ok(Json(signals))
}
