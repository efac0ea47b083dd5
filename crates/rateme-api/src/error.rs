//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use rateme_core::error::Violations;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("invalid request: {0}")]
  Invalid(Violations),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<rateme_core::Error> for ApiError {
  fn from(e: rateme_core::Error) -> Self {
    use rateme_core::Error;
    match e {
      Error::Validation(v) => ApiError::Invalid(v),
      e @ Error::PersonNotFound(_) => ApiError::NotFound(e.to_string()),
      e @ Error::InsufficientData { .. } => ApiError::NotFound(e.to_string()),
      Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response(),
      ApiError::Invalid(v) => (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid data", "violations": v })),
      )
        .into_response(),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": e.to_string() })),
        )
          .into_response()
      }
    }
  }
}
