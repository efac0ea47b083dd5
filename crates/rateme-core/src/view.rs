//! Computed read models. Never stored, always derived.

use serde::Serialize;

use crate::{
  fact::{Comment, FacemashVote, Rating},
  person::{Category, FacemashRecord, Person, PersonId},
  tier::Tier,
};

/// One leaderboard row: the person plus their computed score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
  #[serde(flatten)]
  pub person: Person,
  pub score:  i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
  pub total_people:         u64,
  pub total_ratings:        u64,
  pub total_comments:       u64,
  pub total_facemash_votes: u64,
  /// Mean over every rating in the system; `0.0` when there are none.
  pub avg_rating:           f64,
  /// `None` only when there are no people.
  pub top_category:         Option<Category>,
}

/// How well a person does in FaceMash, bracketed by win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Standing {
  Star,
  Average,
  Weak,
}

impl Standing {
  pub fn from_win_rate(percent: f64) -> Self {
    if percent >= 70.0 {
      Self::Star
    } else if percent >= 50.0 {
      Self::Average
    } else {
      Self::Weak
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonStats {
  pub person_id:   PersonId,
  pub total_votes: u32,
  /// Percentage of FaceMash votes won, `0.0..=100.0`.
  pub win_rate:    f64,
  pub standing:    Standing,
  pub tier:        Tier,
}

// ─── Write outcomes ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedRating {
  pub rating: Rating,
  pub person: Person,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedComment {
  pub comment: Comment,
  pub person:  Person,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedVote {
  pub vote:   FacemashVote,
  pub winner: Person,
  pub loser:  Person,
}

/// A person whose maintained counters disagree with a re-tally of votes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacemashMismatch {
  pub person_id:  PersonId,
  pub maintained: FacemashRecord,
  pub tallied:    FacemashRecord,
}
