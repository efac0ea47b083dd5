//! [`MemoryStore`]: an in-process [`EntityStore`] over ordered maps.
//!
//! All tables sit behind one `RwLock`, so every `commit_*` call is a single
//! write guard and readers never see a half-applied write.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::{
  fact::{Comment, FacemashVote, FactId, NewComment, NewRating, NewVote, Rating},
  person::{Category, FacemashRecord, NewPerson, Person, PersonId, RatingSummary},
  store::EntityStore,
};

#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

#[derive(Default)]
struct Tables {
  people:         BTreeMap<PersonId, Person>,
  ratings:        Vec<Rating>,
  comments:       Vec<Comment>,
  votes:          Vec<FacemashVote>,
  next_person_id: PersonId,
}

impl Tables {
  fn person_mut(&mut self, id: PersonId) -> Result<&mut Person, MemoryError> {
    self.people.get_mut(&id).ok_or(MemoryError::PersonNotFound(id))
  }

  fn require(&self, id: PersonId) -> Result<(), MemoryError> {
    if self.people.contains_key(&id) {
      Ok(())
    } else {
      Err(MemoryError::PersonNotFound(id))
    }
  }
}

/// Fact tables are append-only, so the next id is always `len + 1`.
fn next_id<T>(table: &[T]) -> FactId { table.len() as FactId + 1 }

/// Cloning is cheap; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }
}

impl EntityStore for MemoryStore {
  type Error = MemoryError;

  async fn create_person(&self, input: NewPerson) -> Result<Person, MemoryError> {
    let mut t = self.tables.write().await;
    t.next_person_id += 1;
    let person = Person {
      id:              t.next_person_id,
      name:            input.name,
      description:     input.description,
      category:        input.category,
      image_url:       input.image_url,
      average_rating:  0.0,
      rating_count:    0,
      comments_count:  0,
      facemash_wins:   0,
      facemash_losses: 0,
      view_count:      0,
      is_verified:     false,
      created_at:      Utc::now(),
    };
    t.people.insert(person.id, person.clone());
    Ok(person)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>, MemoryError> {
    Ok(self.tables.read().await.people.get(&id).cloned())
  }

  async fn list_people(
    &self,
    category: Option<Category>,
  ) -> Result<Vec<Person>, MemoryError> {
    let t = self.tables.read().await;
    Ok(
      t.people
        .values()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .cloned()
        .collect(),
    )
  }

  async fn set_view_count(&self, id: PersonId, count: u32) -> Result<(), MemoryError> {
    self.tables.write().await.person_mut(id)?.view_count = count;
    Ok(())
  }

  async fn ratings_for(&self, person_id: PersonId) -> Result<Vec<Rating>, MemoryError> {
    let t = self.tables.read().await;
    Ok(
      t.ratings
        .iter()
        .filter(|r| r.person_id == person_id)
        .cloned()
        .collect(),
    )
  }

  async fn list_ratings(&self) -> Result<Vec<Rating>, MemoryError> {
    Ok(self.tables.read().await.ratings.clone())
  }

  async fn commit_rating(
    &self,
    input: NewRating,
    summary: RatingSummary,
  ) -> Result<Rating, MemoryError> {
    let mut t = self.tables.write().await;
    let person = t.person_mut(input.person_id)?;
    person.average_rating = summary.average;
    person.rating_count = summary.count;

    let rating = Rating {
      id:         next_id(&t.ratings),
      person_id:  input.person_id,
      rating:     input.rating,
      created_at: Utc::now(),
    };
    t.ratings.push(rating.clone());
    Ok(rating)
  }

  async fn comments_for(&self, person_id: PersonId) -> Result<Vec<Comment>, MemoryError> {
    let t = self.tables.read().await;
    Ok(
      t.comments
        .iter()
        .filter(|c| c.person_id == person_id)
        .cloned()
        .collect(),
    )
  }

  async fn count_comments(&self) -> Result<u64, MemoryError> {
    Ok(self.tables.read().await.comments.len() as u64)
  }

  async fn commit_comment(
    &self,
    input: NewComment,
    comments_count: u32,
  ) -> Result<Comment, MemoryError> {
    let mut t = self.tables.write().await;
    t.person_mut(input.person_id)?.comments_count = comments_count;

    let comment = Comment {
      id:         next_id(&t.comments),
      person_id:  input.person_id,
      content:    input.content,
      created_at: Utc::now(),
    };
    t.comments.push(comment.clone());
    Ok(comment)
  }

  async fn list_votes(&self) -> Result<Vec<FacemashVote>, MemoryError> {
    Ok(self.tables.read().await.votes.clone())
  }

  async fn commit_vote(
    &self,
    input: NewVote,
    winner: FacemashRecord,
    loser: FacemashRecord,
  ) -> Result<FacemashVote, MemoryError> {
    let mut t = self.tables.write().await;
    // Check both before touching either.
    t.require(input.winner_id)?;
    t.require(input.loser_id)?;

    let w = t.person_mut(input.winner_id)?;
    w.facemash_wins = winner.wins;
    w.facemash_losses = winner.losses;
    let l = t.person_mut(input.loser_id)?;
    l.facemash_wins = loser.wins;
    l.facemash_losses = loser.losses;

    let vote = FacemashVote {
      id:         next_id(&t.votes),
      winner_id:  input.winner_id,
      loser_id:   input.loser_id,
      created_at: Utc::now(),
    };
    t.votes.push(vote.clone());
    Ok(vote)
  }
}
