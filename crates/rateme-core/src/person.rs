//! Person: the rateable profile and its derived statistics.
//!
//! The identity fields are set once at submission. Every other field is
//! derived from the fact tables and written only by [`crate::Engine`].

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier; increases in insertion order.
pub type PersonId = i64;

/// The fixed set of profile categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Doctors,
  Students,
  Employees,
  Celebrities,
  Other,
}

impl Category {
  pub const ALL: [Category; 5] = [
    Category::Doctors,
    Category::Students,
    Category::Employees,
    Category::Celebrities,
    Category::Other,
  ];

  /// The wire and storage spelling of the category.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Doctors => "doctors",
      Self::Students => "students",
      Self::Employees => "employees",
      Self::Celebrities => "celebrities",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "unknown category: {:?}", self.0)
  }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
  type Err = UnknownCategory;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Category::ALL
      .into_iter()
      .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| UnknownCategory(s.to_owned()))
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
  pub id:              PersonId,
  pub name:            String,
  pub description:     String,
  pub category:        Category,
  pub image_url:       String,
  /// Mean of all ratings; `0.0` while `rating_count == 0`.
  pub average_rating:  f64,
  pub rating_count:    u32,
  pub comments_count:  u32,
  pub facemash_wins:   u32,
  pub facemash_losses: u32,
  pub view_count:      u32,
  pub is_verified:     bool,
  pub created_at:      DateTime<Utc>,
}

impl Person {
  /// FaceMash leaderboard score: wins minus losses.
  pub fn score(&self) -> i64 {
    i64::from(self.facemash_wins) - i64::from(self.facemash_losses)
  }

  pub fn facemash_record(&self) -> FacemashRecord {
    FacemashRecord {
      wins:   self.facemash_wins,
      losses: self.facemash_losses,
    }
  }
}

/// Validated input to [`crate::store::EntityStore::create_person`].
/// Derived fields and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
  pub name:        String,
  pub description: String,
  pub category:    Category,
  pub image_url:   String,
}

// ─── Derived field groups ────────────────────────────────────────────────────

/// `average_rating` and `rating_count`, always written together.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RatingSummary {
  pub average: f64,
  pub count:   u32,
}

impl RatingSummary {
  /// Recompute from every rating value recorded for one person.
  pub fn from_values(values: impl IntoIterator<Item = u8>) -> Self {
    let (sum, count) = values
      .into_iter()
      .fold((0u64, 0u32), |(sum, count), v| {
        (sum.saturating_add(u64::from(v)), count.saturating_add(1))
      });
    let average = if count == 0 {
      0.0
    } else {
      sum as f64 / f64::from(count)
    };
    Self { average, count }
  }
}

/// Counters are `u32` and saturate rather than wrap.
pub(crate) fn saturating_count(n: usize) -> u32 { u32::try_from(n).unwrap_or(u32::MAX) }

/// A person's FaceMash win/loss counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FacemashRecord {
  pub wins:   u32,
  pub losses: u32,
}
