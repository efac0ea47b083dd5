//! Popularity tiers: display brackets over a person's average rating.

use serde::{Serialize, Serializer, ser::SerializeStruct};

/// Background and foreground colours for a tier badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierColors {
  pub background: &'static str,
  pub text:       &'static str,
}

/// Nine ordered tiers. Each covers `[lower_bound, next lower_bound)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
  Pig,
  Clown,
  Joker,
  Pointless,
  Meh,
  HalfDecent,
  Cool,
  Legend,
  Emperor,
}

impl Tier {
  /// Lowest to highest.
  pub const ALL: [Tier; 9] = [
    Tier::Pig,
    Tier::Clown,
    Tier::Joker,
    Tier::Pointless,
    Tier::Meh,
    Tier::HalfDecent,
    Tier::Cool,
    Tier::Legend,
    Tier::Emperor,
  ];

  /// Classify an average rating. Total: values below zero (and NaN) fall
  /// into the lowest tier, values above five into the highest.
  pub fn classify(average: f64) -> Self {
    Self::ALL
      .into_iter()
      .rev()
      .find(|t| average >= t.lower_bound())
      .unwrap_or(Tier::Pig)
  }

  /// Inclusive lower bound of the tier.
  pub fn lower_bound(self) -> f64 {
    match self {
      Self::Pig => 0.0,
      Self::Clown => 1.0,
      Self::Joker => 1.5,
      Self::Pointless => 2.0,
      Self::Meh => 2.5,
      Self::HalfDecent => 3.0,
      Self::Cool => 3.5,
      Self::Legend => 4.0,
      Self::Emperor => 4.5,
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Pig => "Pig",
      Self::Clown => "Clown",
      Self::Joker => "Joker",
      Self::Pointless => "Pointless",
      Self::Meh => "Meh",
      Self::HalfDecent => "Half-decent",
      Self::Cool => "Cool",
      Self::Legend => "Legend",
      Self::Emperor => "Emperor",
    }
  }

  pub fn emblem(self) -> &'static str {
    match self {
      Self::Pig => "🐷",
      Self::Clown => "🤡",
      Self::Joker => "🃏",
      Self::Pointless => "😑",
      Self::Meh => "😐",
      Self::HalfDecent => "😎",
      Self::Cool => "✨",
      Self::Legend => "🔥",
      Self::Emperor => "👑",
    }
  }

  pub fn colors(self) -> TierColors {
    let (background, text) = match self {
      Self::Pig => ("#7f1d1d", "white"),
      Self::Clown => ("#ef4444", "white"),
      Self::Joker => ("#f97316", "white"),
      Self::Pointless => ("#fbbf24", "white"),
      Self::Meh => ("#facc15", "black"),
      Self::HalfDecent => ("#3b82f6", "white"),
      Self::Cool => ("#06b6d4", "black"),
      Self::Legend => ("#22c55e", "black"),
      Self::Emperor => ("#39ff14", "black"),
    };
    TierColors { background, text }
  }
}

impl Serialize for Tier {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut s = serializer.serialize_struct("Tier", 4)?;
    s.serialize_field("label", self.label())?;
    s.serialize_field("emblem", self.emblem())?;
    s.serialize_field("colors", &self.colors())?;
    s.serialize_field("lowerBound", &self.lower_bound())?;
    s.end()
  }
}
