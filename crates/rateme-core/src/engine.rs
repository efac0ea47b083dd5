//! The aggregation engine.
//!
//! [`Engine`] is the only writer of a person's derived fields. Each write
//! validates its input, takes the affected people's locks, recomputes the
//! derived values from the store's facts and hands fact plus values to one
//! atomic `commit_*` call.

use std::{collections::HashMap, iter, sync::Arc};

use rand::seq::index;
use tracing::debug;

use crate::{
  error::{Error, Result},
  fact::{Comment, NewComment, NewRating, NewVote},
  locks::PersonLocks,
  person::{Category, FacemashRecord, Person, PersonId, RatingSummary, saturating_count},
  store::EntityStore,
  tier::Tier,
  validate::{self, PersonDraft},
  view::{
    FacemashMismatch, LeaderboardEntry, PersonStats, RecordedComment, RecordedRating,
    RecordedVote, SiteStats, Standing,
  },
};

/// Default number of rows returned by [`Engine::leaderboard`].
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// Queries shorter than this (after trimming) match nothing.
pub const MIN_SEARCH_CHARS: usize = 2;

pub struct Engine<S> {
  store: Arc<S>,
  locks: PersonLocks,
}

impl<S: EntityStore> Engine<S> {
  pub fn new(store: Arc<S>) -> Self {
    Self {
      store,
      locks: PersonLocks::new(),
    }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  async fn require_person(&self, id: PersonId) -> Result<Person> {
    self
      .store
      .get_person(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::PersonNotFound(id))
  }

  // ── People ────────────────────────────────────────────────────────────

  pub async fn create_person(&self, draft: &PersonDraft) -> Result<Person> {
    let input = validate::person(draft)?;
    let person = self.store.create_person(input).await.map_err(Error::store)?;
    debug!(person_id = person.id, category = %person.category, "person created");
    Ok(person)
  }

  pub async fn person(&self, id: PersonId) -> Result<Person> {
    self.require_person(id).await
  }

  /// Everyone (or one category), newest first.
  pub async fn people(&self, category: Option<Category>) -> Result<Vec<Person>> {
    let mut people = self.store.list_people(category).await.map_err(Error::store)?;
    people.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(people)
  }

  pub async fn record_view(&self, id: PersonId) -> Result<Person> {
    let _guard = self.locks.lock(id).await;
    let mut person = self.require_person(id).await?;
    person.view_count = person.view_count.saturating_add(1);
    self
      .store
      .set_view_count(id, person.view_count)
      .await
      .map_err(Error::store)?;
    Ok(person)
  }

  pub async fn person_stats(&self, id: PersonId) -> Result<PersonStats> {
    let person = self.require_person(id).await?;
    let total_votes = person.facemash_wins.saturating_add(person.facemash_losses);
    let win_rate = if total_votes == 0 {
      0.0
    } else {
      f64::from(person.facemash_wins) / f64::from(total_votes) * 100.0
    };
    Ok(PersonStats {
      person_id: id,
      total_votes,
      win_rate,
      standing: Standing::from_win_rate(win_rate),
      tier: Tier::classify(person.average_rating),
    })
  }

  // ── Ratings ───────────────────────────────────────────────────────────

  pub async fn record_rating(&self, person_id: PersonId, value: i64) -> Result<RecordedRating> {
    let value = validate::rating(value)?;

    let _guard = self.locks.lock(person_id).await;
    let mut person = self.require_person(person_id).await?;

    let existing = self.store.ratings_for(person_id).await.map_err(Error::store)?;
    let summary =
      RatingSummary::from_values(existing.iter().map(|r| r.rating).chain(iter::once(value)));

    let rating = self
      .store
      .commit_rating(NewRating { person_id, rating: value }, summary)
      .await
      .map_err(Error::store)?;

    person.average_rating = summary.average;
    person.rating_count = summary.count;
    debug!(person_id, rating = value, average = summary.average, count = summary.count, "rating recorded");

    Ok(RecordedRating { rating, person })
  }

  /// Top `limit` rated people; unrated people are excluded.
  pub async fn top_rated(&self, limit: usize) -> Result<Vec<Person>> {
    let mut people = self.store.list_people(None).await.map_err(Error::store)?;
    people.retain(|p| p.rating_count > 0);
    sort_by_rating(&mut people);
    people.truncate(limit);
    Ok(people)
  }

  // ── Comments ──────────────────────────────────────────────────────────

  pub async fn record_comment(&self, person_id: PersonId, content: &str) -> Result<RecordedComment> {
    let content = validate::comment(content)?;

    let _guard = self.locks.lock(person_id).await;
    let mut person = self.require_person(person_id).await?;

    let existing = self.store.comments_for(person_id).await.map_err(Error::store)?;
    let count = saturating_count(existing.len()).saturating_add(1);

    let comment = self
      .store
      .commit_comment(NewComment { person_id, content }, count)
      .await
      .map_err(Error::store)?;

    person.comments_count = count;
    debug!(person_id, count, "comment recorded");

    Ok(RecordedComment { comment, person })
  }

  /// A person's comments, newest first.
  pub async fn comments_for(&self, person_id: PersonId) -> Result<Vec<Comment>> {
    self.require_person(person_id).await?;
    let mut comments = self.store.comments_for(person_id).await.map_err(Error::store)?;
    comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    Ok(comments)
  }

  // ── FaceMash ──────────────────────────────────────────────────────────

  /// Two distinct people chosen uniformly at random.
  pub async fn pick_comparison_pair(&self) -> Result<[Person; 2]> {
    let people = self.store.list_people(None).await.map_err(Error::store)?;
    if people.len() < 2 {
      return Err(Error::InsufficientData { available: people.len() });
    }

    let picked = index::sample(&mut rand::thread_rng(), people.len(), 2);
    Ok([people[picked.index(0)].clone(), people[picked.index(1)].clone()])
  }

  pub async fn record_vote(&self, winner_id: PersonId, loser_id: PersonId) -> Result<RecordedVote> {
    validate::vote(winner_id, loser_id)?;

    let _guard = self.locks.lock_all(&[winner_id, loser_id]).await;
    let mut winner = self.require_person(winner_id).await?;
    let mut loser = self.require_person(loser_id).await?;

    winner.facemash_wins = winner.facemash_wins.saturating_add(1);
    loser.facemash_losses = loser.facemash_losses.saturating_add(1);

    let vote = self
      .store
      .commit_vote(
        NewVote { winner_id, loser_id },
        winner.facemash_record(),
        loser.facemash_record(),
      )
      .await
      .map_err(Error::store)?;
    debug!(winner_id, loser_id, "vote recorded");

    Ok(RecordedVote { vote, winner, loser })
  }

  /// Everyone ranked by wins minus losses; ties keep insertion order.
  pub async fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>> {
    let people = self.store.list_people(None).await.map_err(Error::store)?;
    let mut entries: Vec<_> = people
      .into_iter()
      .map(|person| LeaderboardEntry { score: person.score(), person })
      .collect();
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
    Ok(entries)
  }

  /// Re-tally every vote and report each person whose maintained counters
  /// disagree. An empty result means the counters are consistent.
  pub async fn audit_facemash(&self) -> Result<Vec<FacemashMismatch>> {
    let people = self.store.list_people(None).await.map_err(Error::store)?;
    let votes = self.store.list_votes().await.map_err(Error::store)?;

    let mut tally: HashMap<PersonId, FacemashRecord> = HashMap::new();
    for vote in &votes {
      tally.entry(vote.winner_id).or_default().wins += 1;
      tally.entry(vote.loser_id).or_default().losses += 1;
    }

    Ok(
      people
        .into_iter()
        .filter_map(|p| {
          let tallied = tally.get(&p.id).copied().unwrap_or_default();
          let maintained = p.facemash_record();
          (tallied != maintained).then_some(FacemashMismatch {
            person_id: p.id,
            maintained,
            tallied,
          })
        })
        .collect(),
    )
  }

  // ── Search & stats ────────────────────────────────────────────────────

  /// Case-insensitive substring match over name, description and category.
  pub async fn search(&self, query: &str) -> Result<Vec<Person>> {
    let query = query.trim();
    if query.chars().count() < MIN_SEARCH_CHARS {
      return Ok(Vec::new());
    }
    let needle = query.to_lowercase();

    let mut people = self.store.list_people(None).await.map_err(Error::store)?;
    people.retain(|p| {
      p.name.to_lowercase().contains(&needle)
        || p.description.to_lowercase().contains(&needle)
        || p.category.as_str().contains(&needle)
    });
    sort_by_rating(&mut people);
    Ok(people)
  }

  pub async fn site_stats(&self) -> Result<SiteStats> {
    let people = self.store.list_people(None).await.map_err(Error::store)?;
    let ratings = self.store.list_ratings().await.map_err(Error::store)?;
    let total_comments = self.store.count_comments().await.map_err(Error::store)?;
    let votes = self.store.list_votes().await.map_err(Error::store)?;

    let avg_rating = RatingSummary::from_values(ratings.iter().map(|r| r.rating)).average;

    Ok(SiteStats {
      total_people: people.len() as u64,
      total_ratings: ratings.len() as u64,
      total_comments,
      total_facemash_votes: votes.len() as u64,
      avg_rating,
      top_category: top_category(&people),
    })
  }
}

/// Highest average first. The sort is stable, so ties keep store order.
fn sort_by_rating(people: &mut [Person]) {
  people.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating));
}

/// Most populous category; ties go to the one encountered first.
fn top_category(people: &[Person]) -> Option<Category> {
  let mut counts: Vec<(Category, usize)> = Vec::new();
  for p in people {
    match counts.iter_mut().find(|(c, _)| *c == p.category) {
      Some((_, n)) => *n += 1,
      None => counts.push((p.category, 1)),
    }
  }

  let mut best: Option<(Category, usize)> = None;
  for (category, n) in counts {
    if best.is_none_or(|(_, top)| n > top) {
      best = Some((category, n));
    }
  }
  best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests;
