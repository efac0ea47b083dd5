//! Handlers for `/people` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/people` | Optional `?category=<category>\|all` |
//! | `POST` | `/people` | Body: [`PersonDraft`]; returns 201 + stored person |
//! | `GET`  | `/people/:id` | 404 if not found |
//! | `GET`  | `/people/top/:limit` | Rated people only; bad limit falls back to 3 |
//! | `GET`  | `/people/:id/comments` | Newest first |
//! | `GET`  | `/people/:id/stats` | FaceMash win rate and rating tier |
//! | `POST` | `/people/:id/view` | Bumps the view counter |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rateme_core::{
  Engine,
  error::Violations,
  fact::Comment,
  person::{Category, Person, PersonId},
  store::EntityStore,
  validate::PersonDraft,
  view::PersonStats,
};
use serde::Deserialize;

use crate::{error::ApiError, extract::JsonBody};

/// Limit used by `GET /people/top/:limit` when the segment is unusable.
pub const DEFAULT_TOP_LIMIT: usize = 3;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub category: Option<String>,
}

/// `GET /people[?category=<category>]`
pub async fn list<S>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EntityStore,
{
  let category = match params.category.as_deref().map(str::trim) {
    None | Some("") => None,
    Some(c) if c.eq_ignore_ascii_case("all") => None,
    Some(c) => Some(c.parse::<Category>().map_err(|e| {
      ApiError::Invalid(Violations::single("category", e.to_string()))
    })?),
  };

  Ok(Json(engine.people(category).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /people`: returns 201 + the stored [`Person`].
pub async fn create<S>(
  State(engine): State<Arc<Engine<S>>>,
  JsonBody(body): JsonBody<PersonDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  let person = engine.create_person(&body).await?;
  Ok((StatusCode::CREATED, Json(person)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.person(id).await?))
}

// ─── Top rated ────────────────────────────────────────────────────────────────

/// `GET /people/top/:limit`
pub async fn top<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(limit): Path<String>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: EntityStore,
{
  let limit = limit
    .parse::<usize>()
    .ok()
    .filter(|n| *n > 0)
    .unwrap_or(DEFAULT_TOP_LIMIT);
  Ok(Json(engine.top_rated(limit).await?))
}

// ─── Per-person views ─────────────────────────────────────────────────────────

/// `GET /people/:id/comments`
pub async fn comments<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.comments_for(id).await?))
}

/// `GET /people/:id/stats`
pub async fn stats<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<PersonStats>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.person_stats(id).await?))
}

/// `POST /people/:id/view`: returns the person with the bumped counter.
pub async fn view<S>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<PersonId>,
) -> Result<Json<Person>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.record_view(id).await?))
}
