//! The `EntityStore` trait.
//!
//! The trait is implemented by storage backends ([`crate::MemoryStore`],
//! `rateme-store-sqlite`). The [`crate::Engine`] depends on this abstraction,
//! never on a concrete backend.

use std::future::Future;

use crate::{
  fact::{Comment, FacemashVote, NewComment, NewRating, NewVote, Rating},
  person::{Category, FacemashRecord, NewPerson, Person, PersonId, RatingSummary},
};

/// Abstraction over a rateme storage backend.
///
/// Fact writes are append-only. Each `commit_*` method appends one fact and
/// overwrites the derived fields it affects as a single atomic operation:
/// a concurrent reader observes either none or all of it. Computing those
/// derived values is the caller's job.
///
/// All listing methods return rows in insertion (id ascending) order.
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new person with every derived field zeroed.
  fn create_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List all people, optionally restricted to one category.
  fn list_people(
    &self,
    category: Option<Category>,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Overwrite `view_count`.
  fn set_view_count(
    &self,
    id: PersonId,
    count: u32,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  fn ratings_for(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Rating>, Self::Error>> + Send + '_;

  fn list_ratings(
    &self,
  ) -> impl Future<Output = Result<Vec<Rating>, Self::Error>> + Send + '_;

  /// Append `input` and set the person's `average_rating`/`rating_count`
  /// to `summary`.
  fn commit_rating(
    &self,
    input: NewRating,
    summary: RatingSummary,
  ) -> impl Future<Output = Result<Rating, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  fn comments_for(
    &self,
    person_id: PersonId,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  fn count_comments(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Append `input` and set the person's `comments_count`.
  fn commit_comment(
    &self,
    input: NewComment,
    comments_count: u32,
  ) -> impl Future<Output = Result<Comment, Self::Error>> + Send + '_;

  // ── FaceMash ──────────────────────────────────────────────────────────

  fn list_votes(
    &self,
  ) -> impl Future<Output = Result<Vec<FacemashVote>, Self::Error>> + Send + '_;

  /// Append `input` and overwrite both people's win/loss counters.
  fn commit_vote(
    &self,
    input: NewVote,
    winner: FacemashRecord,
    loser: FacemashRecord,
  ) -> impl Future<Output = Result<FacemashVote, Self::Error>> + Send + '_;
}
