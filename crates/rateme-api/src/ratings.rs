//! Handler for `POST /ratings`.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rateme_core::{Engine, error::Violations, person::PersonId, store::EntityStore};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, required},
};

/// JSON body accepted by `POST /ratings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingBody {
  pub person_id: Option<PersonId>,
  /// Range-checked by the engine so violations are reported per field.
  pub rating:    Option<i64>,
}

/// `POST /ratings`: returns 201 + `{"rating": ..., "person": ...}`.
pub async fn create<S>(
  State(engine): State<Arc<Engine<S>>>,
  JsonBody(body): JsonBody<RatingBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  let mut violations = Violations::new();
  let person_id = required(body.person_id, "personId", &mut violations);
  let rating = required(body.rating, "rating", &mut violations);
  let (Some(person_id), Some(rating)) = (person_id, rating) else {
    return Err(ApiError::Invalid(violations));
  };

  let recorded = engine.record_rating(person_id, rating).await?;
  Ok((StatusCode::CREATED, Json(recorded)))
}
