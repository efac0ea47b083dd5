//! Input validation for every write the engine accepts.
//!
//! Each validator collects all failing fields before returning, so callers
//! can report the complete set in one response.

use serde::Deserialize;

use crate::{
  error::{Error, Result, Violations},
  fact::{MAX_RATING, MIN_RATING},
  person::{Category, NewPerson, PersonId},
};

/// Unvalidated profile submission, as received from a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDraft {
  #[serde(default)]
  pub name:        String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category:    String,
  #[serde(default)]
  pub image_url:   String,
}

pub fn person(draft: &PersonDraft) -> Result<NewPerson> {
  let mut violations = Violations::new();

  let name = draft.name.trim();
  if name.is_empty() {
    violations.push("name", "must not be empty");
  }

  let description = draft.description.trim();
  if description.is_empty() {
    violations.push("description", "must not be empty");
  }

  let category = match draft.category.parse::<Category>() {
    Ok(c) => Some(c),
    Err(_) => {
      let allowed: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
      violations.push(
        "category",
        format!("must be one of {}", allowed.join(", ")),
      );
      None
    }
  };

  let image_url = draft.image_url.trim();
  if !is_http_url(image_url) {
    violations.push("imageUrl", "must be an absolute http(s) URL");
  }

  match category {
    Some(category) if violations.is_empty() => Ok(NewPerson {
      name: name.to_owned(),
      description: description.to_owned(),
      category,
      image_url: image_url.to_owned(),
    }),
    _ => Err(Error::Validation(violations)),
  }
}

/// Accepts any integer from the wire so out-of-range values are reported as
/// field violations rather than parse failures.
pub fn rating(value: i64) -> Result<u8> {
  match u8::try_from(value) {
    Ok(v) if (MIN_RATING..=MAX_RATING).contains(&v) => Ok(v),
    _ => Err(Error::Validation(Violations::single(
      "rating",
      format!("must be between {MIN_RATING} and {MAX_RATING}"),
    ))),
  }
}

/// Returns the trimmed content.
pub fn comment(content: &str) -> Result<String> {
  let trimmed = content.trim();
  if trimmed.is_empty() {
    return Err(Error::Validation(Violations::single(
      "content",
      "must not be empty",
    )));
  }
  Ok(trimmed.to_owned())
}

pub fn vote(winner_id: PersonId, loser_id: PersonId) -> Result<()> {
  if winner_id == loser_id {
    return Err(Error::Validation(Violations::single(
      "loserId",
      "a person cannot be voted against themselves",
    )));
  }
  Ok(())
}

fn is_http_url(s: &str) -> bool {
  ["http://", "https://"].iter().any(|scheme| {
    s.len() > scheme.len()
      && s.get(..scheme.len()).is_some_and(|p| p.eq_ignore_ascii_case(scheme))
      && !s.contains(char::is_whitespace)
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft() -> PersonDraft {
    PersonDraft {
      name:        "  Dr. Sharif ".into(),
      description: "Physics lecturer".into(),
      category:    "doctors".into(),
      image_url:   "https://example.com/a.jpg".into(),
    }
  }

  #[test]
  fn valid_person_is_trimmed() {
    let p = person(&draft()).unwrap();
    assert_eq!(p.name, "Dr. Sharif");
    assert_eq!(p.category, Category::Doctors);
  }

  #[test]
  fn every_bad_field_is_reported() {
    let err = person(&PersonDraft {
      name:        "   ".into(),
      description: String::new(),
      category:    "wizards".into(),
      image_url:   "ftp://nope".into(),
    })
    .unwrap_err();

    let Error::Validation(v) = err else { panic!("expected validation error") };
    let fields: Vec<_> = v.fields().collect();
    assert_eq!(fields, ["name", "description", "category", "imageUrl"]);
  }

  #[test]
  fn rating_bounds() {
    assert_eq!(rating(1).unwrap(), 1);
    assert_eq!(rating(5).unwrap(), 5);
    for bad in [0, 6, -1, 300] {
      assert!(matches!(rating(bad), Err(Error::Validation(_))), "{bad}");
    }
  }

  #[test]
  fn blank_comment_rejected() {
    assert!(matches!(comment(" \n\t "), Err(Error::Validation(_))));
    assert_eq!(comment("  nice  ").unwrap(), "nice");
  }

  #[test]
  fn self_vote_rejected() {
    for id in [0, 1, 42] {
      assert!(matches!(vote(id, id), Err(Error::Validation(_))));
    }
    assert!(vote(1, 2).is_ok());
  }
}
