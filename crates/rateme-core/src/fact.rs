//! Fact types: the immutable events that drive every derived statistic.
//!
//! Facts are append-only. Once written, no field is ever updated and no fact
//! is ever deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::person::PersonId;

pub type FactId = i64;

// ─── Rating ──────────────────────────────────────────────────────────────────

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
  pub id:         FactId,
  pub person_id:  PersonId,
  /// Always within `MIN_RATING..=MAX_RATING`.
  pub rating:     u8,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewRating {
  pub person_id: PersonId,
  pub rating:    u8,
}

// ─── Comment ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
  pub id:         FactId,
  pub person_id:  PersonId,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
  pub person_id: PersonId,
  /// Already trimmed and non-empty.
  pub content:   String,
}

// ─── FacemashVote ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacemashVote {
  pub id:         FactId,
  pub winner_id:  PersonId,
  pub loser_id:   PersonId,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewVote {
  pub winner_id: PersonId,
  pub loser_id:  PersonId,
}
