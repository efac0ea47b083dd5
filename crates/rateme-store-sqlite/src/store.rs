//! [`SqliteStore`]: the SQLite implementation of [`EntityStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use rateme_core::{
  fact::{Comment, FacemashVote, NewComment, NewRating, NewVote, Rating},
  person::{Category, FacemashRecord, NewPerson, Person, PersonId, RatingSummary},
  store::EntityStore,
};

use crate::{
  encode::{PERSON_COLUMNS, RawComment, RawPerson, RawRating, RawVote, encode_dt},
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A rateme entity store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn create_person(&self, input: NewPerson) -> Result<Person> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let category_str = input.category.as_str();
    let (name, description, image_url) =
      (input.name.clone(), input.description.clone(), input.image_url.clone());

    let id: PersonId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO people (name, description, category, image_url, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![name, description, category_str, image_url, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Person {
      id,
      name: input.name,
      description: input.description,
      category: input.category,
      image_url: input.image_url,
      average_rating: 0.0,
      rating_count: 0,
      comments_count: 0,
      facemash_wins: 0,
      facemash_losses: 0,
      view_count: 0,
      is_verified: false,
      created_at,
    })
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PERSON_COLUMNS} FROM people WHERE id = ?1"),
            rusqlite::params![id],
            RawPerson::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self, category: Option<Category>) -> Result<Vec<Person>> {
    let category_str = category.map(Category::as_str);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(c) = category_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {PERSON_COLUMNS} FROM people WHERE category = ?1 ORDER BY id"
          ))?;
          stmt
            .query_map(rusqlite::params![c], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt =
            conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM people ORDER BY id"))?;
          stmt
            .query_map([], RawPerson::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn set_view_count(&self, id: PersonId, count: u32) -> Result<()> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE people SET view_count = ?2 WHERE id = ?1",
          rusqlite::params![id, count],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }
    Ok(())
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn ratings_for(&self, person_id: PersonId) -> Result<Vec<Rating>> {
    let raws: Vec<RawRating> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, person_id, rating, created_at FROM ratings
           WHERE person_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawRating::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRating::into_rating).collect()
  }

  async fn list_ratings(&self) -> Result<Vec<Rating>> {
    let raws: Vec<RawRating> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, person_id, rating, created_at FROM ratings ORDER BY id")?;
        let rows = stmt
          .query_map([], RawRating::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRating::into_rating).collect()
  }

  async fn commit_rating(&self, input: NewRating, summary: RatingSummary) -> Result<Rating> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewRating { person_id, rating } = input;

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE people SET average_rating = ?2, rating_count = ?3 WHERE id = ?1",
          rusqlite::params![person_id, summary.average, summary.count],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO ratings (person_id, rating, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, rating, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?
      .ok_or(Error::PersonNotFound(person_id))?;

    Ok(Rating { id, person_id, rating, created_at })
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn comments_for(&self, person_id: PersonId) -> Result<Vec<Comment>> {
    let raws: Vec<RawComment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, person_id, content, created_at FROM comments
           WHERE person_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![person_id], RawComment::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComment::into_comment).collect()
  }

  async fn count_comments(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM comments", [], |r| r.get(0))?))
      .await?;
    Ok(n.max(0) as u64)
  }

  async fn commit_comment(&self, input: NewComment, comments_count: u32) -> Result<Comment> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let person_id = input.person_id;
    let content = input.content.clone();

    let id = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE people SET comments_count = ?2 WHERE id = ?1",
          rusqlite::params![person_id, comments_count],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO comments (person_id, content, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, content, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?
      .ok_or(Error::PersonNotFound(person_id))?;

    Ok(Comment { id, person_id, content: input.content, created_at })
  }

  // ── FaceMash ──────────────────────────────────────────────────────────────

  async fn list_votes(&self) -> Result<Vec<FacemashVote>> {
    let raws: Vec<RawVote> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, winner_id, loser_id, created_at FROM facemash_votes ORDER BY id",
        )?;
        let rows = stmt
          .query_map([], RawVote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVote::into_vote).collect()
  }

  async fn commit_vote(
    &self,
    input:  NewVote,
    winner: FacemashRecord,
    loser:  FacemashRecord,
  ) -> Result<FacemashVote> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let NewVote { winner_id, loser_id } = input;

    // Err(id) names the person row that was missing.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        for (id, record) in [(winner_id, winner), (loser_id, loser)] {
          let changed = tx.execute(
            "UPDATE people SET facemash_wins = ?2, facemash_losses = ?3 WHERE id = ?1",
            rusqlite::params![id, record.wins, record.losses],
          )?;
          if changed == 0 {
            return Ok(Err(id));
          }
        }
        tx.execute(
          "INSERT INTO facemash_votes (winner_id, loser_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![winner_id, loser_id, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Ok(id))
      })
      .await?;

    let id = outcome.map_err(Error::PersonNotFound)?;
    Ok(FacemashVote { id, winner_id, loser_id, created_at })
  }
}
