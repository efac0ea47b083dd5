//! Handler for `POST /comments`.
//!
//! Listing lives under `/people/:id/comments`; see [`crate::people`].

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rateme_core::{Engine, error::Violations, person::PersonId, store::EntityStore};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, required},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
  pub person_id: Option<PersonId>,
  #[serde(default)]
  pub content:   String,
}

/// `POST /comments`: returns 201 + `{"comment": ..., "person": ...}`.
pub async fn create<S>(
  State(engine): State<Arc<Engine<S>>>,
  JsonBody(body): JsonBody<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  let mut violations = Violations::new();
  let Some(person_id) = required(body.person_id, "personId", &mut violations) else {
    return Err(ApiError::Invalid(violations));
  };

  let recorded = engine.record_comment(person_id, &body.content).await?;
  Ok((StatusCode::CREATED, Json(recorded)))
}
