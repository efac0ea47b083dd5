//! Handlers for `GET /search` and `GET /stats`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use rateme_core::{Engine, person::Person, store::EntityStore, view::SiteStats};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Matched case-insensitively against name, description and category.
  /// Fewer than two characters yields an empty list.
  #[serde(default)]
  pub q: String,
}

/// `GET /search?q=<text>`
pub async fn handler<S>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.search(&params.q).await?))
}

/// `GET /stats`
pub async fn stats<S>(
  State(engine): State<Arc<Engine<S>>>,
) -> Result<Json<SiteStats>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.site_stats().await?))
}
