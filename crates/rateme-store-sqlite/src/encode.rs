//! Encoding and decoding helpers between rateme domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and categories by their wire
//! spelling (`Category::as_str`). Rows are first read into `Raw*` structs of plain column values
//! inside the connection thread, then decoded on the async side.

use chrono::{DateTime, Utc};
use rateme_core::{
  fact::{Comment, FacemashVote, FactId, MAX_RATING, MIN_RATING, Rating},
  person::{Category, Person, PersonId},
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Category ────────────────────────────────────────────────────────────────

pub fn decode_category(s: &str) -> Result<Category> {
  s.parse().map_err(|_| Error::UnknownCategory(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawPerson::from_row`].
pub const PERSON_COLUMNS: &str = "id, name, description, category, image_url, \
  average_rating, rating_count, comments_count, facemash_wins, facemash_losses, \
  view_count, is_verified, created_at";

pub struct RawPerson {
  pub id:              PersonId,
  pub name:            String,
  pub description:     String,
  pub category:        String,
  pub image_url:       String,
  pub average_rating:  f64,
  pub rating_count:    u32,
  pub comments_count:  u32,
  pub facemash_wins:   u32,
  pub facemash_losses: u32,
  pub view_count:      u32,
  pub is_verified:     bool,
  pub created_at:      String,
}

impl RawPerson {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      name:            row.get(1)?,
      description:     row.get(2)?,
      category:        row.get(3)?,
      image_url:       row.get(4)?,
      average_rating:  row.get(5)?,
      rating_count:    row.get(6)?,
      comments_count:  row.get(7)?,
      facemash_wins:   row.get(8)?,
      facemash_losses: row.get(9)?,
      view_count:      row.get(10)?,
      is_verified:     row.get(11)?,
      created_at:      row.get(12)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:              self.id,
      name:            self.name,
      description:     self.description,
      category:        decode_category(&self.category)?,
      image_url:       self.image_url,
      average_rating:  self.average_rating,
      rating_count:    self.rating_count,
      comments_count:  self.comments_count,
      facemash_wins:   self.facemash_wins,
      facemash_losses: self.facemash_losses,
      view_count:      self.view_count,
      is_verified:     self.is_verified,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawRating {
  pub id:         FactId,
  pub person_id:  PersonId,
  pub rating:     i64,
  pub created_at: String,
}

impl RawRating {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      person_id:  row.get(1)?,
      rating:     row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_rating(self) -> Result<Rating> {
    let rating = u8::try_from(self.rating)
      .ok()
      .filter(|v| (MIN_RATING..=MAX_RATING).contains(v))
      .ok_or(Error::RatingOutOfRange(self.rating))?;
    Ok(Rating {
      id: self.id,
      person_id: self.person_id,
      rating,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawComment {
  pub id:         FactId,
  pub person_id:  PersonId,
  pub content:    String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      person_id:  row.get(1)?,
      content:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         self.id,
      person_id:  self.person_id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub struct RawVote {
  pub id:         FactId,
  pub winner_id:  PersonId,
  pub loser_id:   PersonId,
  pub created_at: String,
}

impl RawVote {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      winner_id:  row.get(1)?,
      loser_id:   row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_vote(self) -> Result<FacemashVote> {
    Ok(FacemashVote {
      id:         self.id,
      winner_id:  self.winner_id,
      loser_id:   self.loser_id,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
