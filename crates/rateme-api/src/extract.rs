//! Request extractors whose failures render as [`ApiError`].

use axum::extract::{FromRequest, rejection::JsonRejection};
use rateme_core::error::Violations;

use crate::error::ApiError;

/// `axum::Json`, but malformed bodies become a 400 violations response
/// instead of axum's plain-text rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::Invalid(Violations::single("body", rejection.body_text()))
  }
}

/// Record a violation on `field` when a required body field is absent.
pub fn required<T>(value: Option<T>, field: &'static str, violations: &mut Violations) -> Option<T> {
  if value.is_none() {
    violations.push(field, "is required");
  }
  value
}
