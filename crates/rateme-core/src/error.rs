//! Error types for `rateme-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::person::PersonId;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
  pub field:   &'static str,
  pub message: String,
}

/// Every field that failed validation for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
  pub fn new() -> Self { Self::default() }

  /// A set holding exactly one violation.
  pub fn single(field: &'static str, message: impl Into<String>) -> Self {
    let mut v = Self::new();
    v.push(field, message);
    v
  }

  pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
    self.0.push(FieldViolation { field, message: message.into() });
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.iter().map(|v| v.field)
  }

  pub fn as_slice(&self) -> &[FieldViolation] { &self.0 }

  /// `Ok(())` when nothing was pushed, otherwise a validation error.
  pub fn into_result(self) -> Result<()> {
    if self.is_empty() {
      Ok(())
    } else {
      Err(Error::Validation(self))
    }
  }
}

impl fmt::Display for Violations {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, v) in self.0.iter().enumerate() {
      if i > 0 {
        f.write_str("; ")?;
      }
      write!(f, "{}: {}", v.field, v.message)?;
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(Violations),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("a comparison needs at least two people, found {available}")]
  InsufficientData { available: usize },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
