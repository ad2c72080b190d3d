use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::services::signals::SignalError;
use crate::sources::SourceError;

/// Application error types.
///
/// Every variant renders as `400 Bad Request` with an `{"error": message}`
/// body so clients see a single failure shape.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    DataFetch(String),

    #[error("{0}")]
    InsufficientData(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::DataFetch(err.to_string())
    }
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        match err {
            SignalError::InsufficientData { .. } => AppError::InsufficientData(err.to_string()),
            SignalError::EmptySeries { .. } | SignalError::Source(_) => {
                AppError::DataFetch(err.to_string())
            }
            SignalError::Worker(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        debug!("Request failed: {}", message);

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_is_bad_request() {
        let errors = [
            AppError::Validation("v".into()),
            AppError::DataFetch("d".into()),
            AppError::InsufficientData("i".into()),
            AppError::Internal("x".into()),
        ];
        for err in errors {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_signal_error_mapping() {
        let err: AppError = SignalError::InsufficientData {
            symbol: "AAPL".into(),
        }
        .into();
        assert!(matches!(err, AppError::InsufficientData(_)));
        assert!(err.to_string().contains("AAPL"));

        let err: AppError = SignalError::EmptySeries {
            symbol: "XYZ".into(),
        }
        .into();
        assert!(matches!(err, AppError::DataFetch(_)));
    }

    #[test]
    fn test_worker_error_is_internal() {
        let err: AppError = SignalError::Worker("task panicked".into()).into();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_source_error_mapping() {
        let err: AppError = SourceError::Status(502).into();
        assert!(matches!(err, AppError::DataFetch(_)));
        assert!(err.to_string().contains("502"));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::Validation("Missing parameter: stocks".into()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({ "error": "Missing parameter: stocks" }));
    }
}
