//! Demo data for a fresh store.
//!
//! Everything goes through the [`Engine`], so the seeded derived fields obey
//! the same invariants as live traffic.

use rateme_core::{Engine, Result, store::EntityStore, validate::PersonDraft};
use tracing::info;

struct SamplePerson {
  name:        &'static str,
  description: &'static str,
  category:    &'static str,
  image_url:   &'static str,
}

const PEOPLE: [SamplePerson; 4] = [
  SamplePerson {
    name:        "Dr. Mohamed El-Sherif",
    description: "Physics lecturer who explains everything like a bedtime story",
    category:    "doctors",
    image_url:   "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&w=300&h=300",
  },
  SamplePerson {
    name:        "Ahmed the Diligent",
    description: "Engineering student, always in the library, never quite gets it",
    category:    "students",
    image_url:   "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?auto=format&fit=crop&w=300&h=300",
  },
  SamplePerson {
    name:        "Mariam from Finance",
    description: "Builds spreadsheets like she is playing a puzzle game",
    category:    "employees",
    image_url:   "https://images.unsplash.com/photo-1517841905240-472988babdf9?auto=format&fit=crop&w=300&h=300",
  },
  SamplePerson {
    name:        "Campus Celebrity",
    description: "Everyone knows him, nobody knows why",
    category:    "celebrities",
    image_url:   "https://images.unsplash.com/photo-1463453091185-61582044d556?auto=format&fit=crop&w=300&h=300",
  },
];

/// `(person index, stars)`
const RATINGS: [(usize, i64); 5] = [(0, 5), (0, 4), (1, 2), (2, 4), (3, 1)];

const COMMENTS: [(usize, &str); 4] = [
  (0, "Best lecturer in the faculty, patient with everyone 👑"),
  (1, "Studies all the time but the grades never show up 😅"),
  (2, "Works hard, always stressed about the workload"),
  (3, "If there were negative stars I would give one 😒"),
];

/// `(winner index, loser index)`
const VOTES: [(usize, usize); 3] = [(0, 1), (2, 3), (0, 2)];

/// Record the demo data if the store holds no people. Returns whether
/// anything was written.
pub async fn seed_if_empty<S: EntityStore>(engine: &Engine<S>) -> Result<bool> {
  if !engine.people(None).await?.is_empty() {
    return Ok(false);
  }

  let mut ids = Vec::with_capacity(PEOPLE.len());
  for p in &PEOPLE {
    let draft = PersonDraft {
      name:        p.name.to_owned(),
      description: p.description.to_owned(),
      category:    p.category.to_owned(),
      image_url:   p.image_url.to_owned(),
    };
    ids.push(engine.create_person(&draft).await?.id);
  }

  for (i, stars) in RATINGS {
    engine.record_rating(ids[i], stars).await?;
  }
  for (i, content) in COMMENTS {
    engine.record_comment(ids[i], content).await?;
  }
  for (w, l) in VOTES {
    engine.record_vote(ids[w], ids[l]).await?;
  }

  info!(people = ids.len(), "seeded sample data");
  Ok(true)
}
