//! Handlers for `/facemash` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/facemash/random` | Two distinct people; 404 with fewer than two |
//! | `POST` | `/facemash/vote` | Body: `{"winnerId":1,"loserId":2}` |
//! | `GET`  | `/facemash/leaderboard` | Optional `?limit=` (default 10) |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rateme_core::{
  Engine,
  engine::DEFAULT_LEADERBOARD_LIMIT,
  error::Violations,
  person::{Person, PersonId},
  store::EntityStore,
  view::LeaderboardEntry,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{JsonBody, required},
};

/// `GET /facemash/random`
pub async fn random<S>(
  State(engine): State<Arc<Engine<S>>>,
) -> Result<Json<[Person; 2]>, ApiError>
where
  S: EntityStore,
{
  Ok(Json(engine.pick_comparison_pair().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteBody {
  pub winner_id: Option<PersonId>,
  pub loser_id:  Option<PersonId>,
}

/// `POST /facemash/vote`: returns 201 + `{"vote", "winner", "loser"}`.
pub async fn vote<S>(
  State(engine): State<Arc<Engine<S>>>,
  JsonBody(body): JsonBody<VoteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  let mut violations = Violations::new();
  let winner_id = required(body.winner_id, "winnerId", &mut violations);
  let loser_id = required(body.loser_id, "loserId", &mut violations);
  let (Some(winner_id), Some(loser_id)) = (winner_id, loser_id) else {
    return Err(ApiError::Invalid(violations));
  };

  let recorded = engine.record_vote(winner_id, loser_id).await?;
  Ok((StatusCode::CREATED, Json(recorded)))
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  pub limit: Option<usize>,
}

/// `GET /facemash/leaderboard[?limit=<n>]`
pub async fn leaderboard<S>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: EntityStore,
{
  let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
  Ok(Json(engine.leaderboard(limit).await?))
}
