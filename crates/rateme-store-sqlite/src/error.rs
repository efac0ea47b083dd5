//! Error type for `rateme-store-sqlite`.

use rateme_core::person::PersonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown category in database: {0:?}")]
  UnknownCategory(String),

  #[error("rating value out of range in database: {0}")]
  RatingOutOfRange(i64),

  /// A commit referenced a person row that does not exist.
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
