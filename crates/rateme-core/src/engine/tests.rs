//! Engine tests against the in-memory store.

use std::{
  collections::HashSet,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use super::*;
use crate::{MemoryStore, validate::PersonDraft};

fn engine() -> Engine<MemoryStore> { Engine::new(Arc::new(MemoryStore::new())) }

fn draft(name: &str, category: &str) -> PersonDraft {
  PersonDraft {
    name:        name.into(),
    description: format!("{name} is on the board"),
    category:    category.into(),
    image_url:   "https://images.example.com/p.jpg".into(),
  }
}

async fn add(e: &Engine<MemoryStore>, name: &str) -> Person {
  e.create_person(&draft(name, "students")).await.unwrap()
}

// ─── People ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_person_has_zeroed_derived_fields() {
  let e = engine();
  let p = add(&e, "Ahmed").await;
  assert_eq!(p.average_rating, 0.0);
  assert_eq!(p.rating_count, 0);
  assert_eq!(p.comments_count, 0);
  assert_eq!(p.facemash_record(), FacemashRecord::default());
  assert_eq!(p.view_count, 0);
  assert!(!p.is_verified);
}

#[tokio::test]
async fn invalid_person_is_rejected() {
  let e = engine();
  let err = e.create_person(&draft("", "students")).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert!(e.people(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn people_newest_first_and_filtered() {
  let e = engine();
  let a = add(&e, "A").await;
  let b = e.create_person(&draft("B", "doctors")).await.unwrap();
  let c = add(&e, "C").await;

  let all: Vec<_> = e.people(None).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(all, [c.id, b.id, a.id]);

  let doctors = e.people(Some(Category::Doctors)).await.unwrap();
  assert_eq!(doctors.len(), 1);
  assert_eq!(doctors[0].id, b.id);
}

#[tokio::test]
async fn unknown_person_is_not_found() {
  let e = engine();
  assert!(matches!(e.person(99).await, Err(Error::PersonNotFound(99))));
}

#[tokio::test]
async fn record_view_increments() {
  let e = engine();
  let p = add(&e, "Mariam").await;
  e.record_view(p.id).await.unwrap();
  let after = e.record_view(p.id).await.unwrap();
  assert_eq!(after.view_count, 2);
  assert_eq!(e.person(p.id).await.unwrap().view_count, 2);
}

// ─── Ratings ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn average_and_count_track_every_rating() {
  let e = engine();
  let p = add(&e, "P").await;

  let values = [5, 1, 3, 4, 4, 2];
  for (i, v) in values.iter().enumerate() {
    let out = e.record_rating(p.id, *v).await.unwrap();
    let seen = &values[..=i];
    let mean = seen.iter().sum::<i64>() as f64 / seen.len() as f64;
    assert_eq!(out.person.rating_count as usize, seen.len());
    assert!((out.person.average_rating - mean).abs() < 1e-9);
  }

  // Re-derivable from the raw facts.
  let stored = e.person(p.id).await.unwrap();
  let facts = e.store().ratings_for(p.id).await.unwrap();
  let rederived = RatingSummary::from_values(facts.iter().map(|r| r.rating));
  assert_eq!(stored.rating_count, rederived.count);
  assert!((stored.average_rating - rederived.average).abs() < 1e-9);
}

#[tokio::test]
async fn rating_out_of_range_is_validation_error() {
  let e = engine();
  let p = add(&e, "P").await;
  for bad in [0, 6, -3] {
    assert!(matches!(e.record_rating(p.id, bad).await, Err(Error::Validation(_))));
  }
  assert!(e.store().list_ratings().await.unwrap().is_empty());
}

#[tokio::test]
async fn rating_unknown_person_is_not_found() {
  let e = engine();
  assert!(matches!(e.record_rating(7, 3).await, Err(Error::PersonNotFound(7))));
}

#[tokio::test]
async fn rating_touches_only_its_person() {
  let e = engine();
  let a = add(&e, "A").await;
  let b = add(&e, "B").await;
  e.record_rating(a.id, 5).await.unwrap();
  assert_eq!(e.person(b.id).await.unwrap(), b);
}

#[tokio::test]
async fn concurrent_ratings_lose_no_update() {
  let e = Arc::new(engine());
  let id = add(&e, "Busy").await.id;

  let mut handles = Vec::new();
  for i in 0..50 {
    let e = e.clone();
    handles.push(tokio::spawn(async move {
      e.record_rating(id, i % 5 + 1).await.unwrap();
    }));
  }
  for h in handles {
    h.await.unwrap();
  }

  let stored = e.person(id).await.unwrap();
  assert_eq!(stored.rating_count, 50);
  // Ten of each value 1..=5.
  assert!((stored.average_rating - 3.0).abs() < 1e-9);
}

/// Summaries after each prefix of `values`: `out[k]` covers the first `k`.
fn prefix_summaries(values: &[i64]) -> Vec<RatingSummary> {
  (0..=values.len())
    .map(|k| RatingSummary::from_values(values[..k].iter().map(|v| *v as u8)))
    .collect()
}

fn assert_is_prefix(p: &Person, prefixes: &[RatingSummary]) {
  let count = p.rating_count as usize;
  assert!(count < prefixes.len(), "count {count} beyond recorded facts");
  let expected = prefixes[count];
  assert!(
    (p.average_rating - expected.average).abs() < 1e-9,
    "count {count} paired with average {} instead of {}",
    p.average_rating,
    expected.average
  );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn readers_never_see_half_applied_ratings() {
  let e = Arc::new(engine());
  let id = add(&e, "Watched").await.id;

  let values: Vec<i64> = (0..200).map(|i| [5, 1, 4, 2, 3, 5, 5][i % 7]).collect();
  let prefixes = Arc::new(prefix_summaries(&values));
  let done = Arc::new(AtomicBool::new(false));

  let readers: Vec<_> = (0..3)
    .map(|_| {
      let (e, prefixes, done) = (e.clone(), prefixes.clone(), done.clone());
      tokio::spawn(async move {
        let mut snapshots = 0usize;
        loop {
          let finished = done.load(Ordering::Acquire);
          assert_is_prefix(&e.person(id).await.unwrap(), &prefixes);
          for p in e.top_rated(5).await.unwrap() {
            assert_is_prefix(&p, &prefixes);
          }
          snapshots += 1;
          if finished {
            break snapshots;
          }
          tokio::task::yield_now().await;
        }
      })
    })
    .collect();

  for v in &values {
    e.record_rating(id, *v).await.unwrap();
  }
  done.store(true, Ordering::Release);

  for r in readers {
    assert!(r.await.unwrap() > 0);
  }
  assert_is_prefix(&e.person(id).await.unwrap(), &prefixes);
  assert_eq!(e.person(id).await.unwrap().rating_count as usize, values.len());
}

#[tokio::test]
async fn writes_for_unknown_people_leave_no_lock_slots() {
  let e = engine();
  let known = add(&e, "Known").await;

  for id in 1_000..11_000 {
    assert!(matches!(e.record_rating(id, 3).await, Err(Error::PersonNotFound(_))));
  }
  for id in 1_000..1_100 {
    assert!(e.record_comment(id, "hello").await.is_err());
    assert!(e.record_view(id).await.is_err());
    assert!(e.record_vote(known.id, id).await.is_err());
  }
  e.record_rating(known.id, 4).await.unwrap();

  assert_eq!(e.locks.tracked(), 0);
}

#[tokio::test]
async fn top_rated_excludes_unrated_and_sorts() {
  let e = engine();
  let low = add(&e, "Low").await;
  let _unrated = add(&e, "Unrated").await;
  let high = add(&e, "High").await;
  let tie = add(&e, "Tie").await;

  e.record_rating(low.id, 2).await.unwrap();
  e.record_rating(high.id, 5).await.unwrap();
  e.record_rating(tie.id, 5).await.unwrap();

  let ids: Vec<_> = e.top_rated(10).await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, [high.id, tie.id, low.id]);

  assert_eq!(e.top_rated(1).await.unwrap().len(), 1);
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn comments_count_tracks_comments() {
  let e = engine();
  let p = add(&e, "P").await;
  for i in 1..=3 {
    let out = e.record_comment(p.id, &format!("comment {i}")).await.unwrap();
    assert_eq!(out.person.comments_count, i);
  }

  let comments = e.comments_for(p.id).await.unwrap();
  assert_eq!(comments.len(), 3);
  assert_eq!(comments[0].content, "comment 3");
  assert_eq!(e.person(p.id).await.unwrap().comments_count, 3);
}

#[tokio::test]
async fn blank_comment_is_rejected() {
  let e = engine();
  let p = add(&e, "P").await;
  assert!(matches!(e.record_comment(p.id, "   ").await, Err(Error::Validation(_))));
  assert_eq!(e.person(p.id).await.unwrap().comments_count, 0);
}

#[tokio::test]
async fn comment_unknown_person_is_not_found() {
  let e = engine();
  assert!(matches!(e.record_comment(3, "hi").await, Err(Error::PersonNotFound(3))));
  assert!(matches!(e.comments_for(3).await, Err(Error::PersonNotFound(3))));
}

// ─── FaceMash ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pairing_needs_two_people() {
  let e = engine();
  assert!(matches!(
    e.pick_comparison_pair().await,
    Err(Error::InsufficientData { available: 0 })
  ));
  add(&e, "Only").await;
  assert!(matches!(
    e.pick_comparison_pair().await,
    Err(Error::InsufficientData { available: 1 })
  ));
}

#[tokio::test]
async fn pairing_returns_distinct_people() {
  let e = engine();
  for name in ["A", "B", "C", "D"] {
    add(&e, name).await;
  }
  let mut seen = HashSet::new();
  for _ in 0..200 {
    let [a, b] = e.pick_comparison_pair().await.unwrap();
    assert_ne!(a.id, b.id);
    seen.insert(a.id);
    seen.insert(b.id);
  }
  assert_eq!(seen.len(), 4);
}

#[tokio::test]
async fn self_vote_is_validation_error() {
  let e = engine();
  let p = add(&e, "P").await;
  assert!(matches!(e.record_vote(p.id, p.id).await, Err(Error::Validation(_))));
  // Rejected before existence is checked.
  assert!(matches!(e.record_vote(42, 42).await, Err(Error::Validation(_))));
}

#[tokio::test]
async fn vote_with_unknown_person_changes_nothing() {
  let e = engine();
  let p = add(&e, "P").await;
  assert!(matches!(e.record_vote(p.id, 99).await, Err(Error::PersonNotFound(99))));
  assert!(matches!(e.record_vote(99, p.id).await, Err(Error::PersonNotFound(99))));
  assert_eq!(e.person(p.id).await.unwrap().facemash_wins, 0);
  assert!(e.store().list_votes().await.unwrap().is_empty());
}

#[tokio::test]
async fn counters_agree_with_retally() {
  let e = Arc::new(engine());
  let mut ids = Vec::new();
  for name in ["A", "B", "C", "D", "E"] {
    ids.push(add(&e, name).await.id);
  }

  let mut handles = Vec::new();
  for i in 0..40 {
    let (w, l) = (ids[i % 5], ids[(i * 3 + 1) % 5]);
    if w == l {
      continue;
    }
    let e = e.clone();
    handles.push(tokio::spawn(async move { e.record_vote(w, l).await.unwrap() }));
  }
  for h in handles {
    h.await.unwrap();
  }

  assert!(e.audit_facemash().await.unwrap().is_empty());

  let board = e.leaderboard(usize::MAX).await.unwrap();
  for entry in &board {
    assert_eq!(
      entry.score,
      i64::from(entry.person.facemash_wins) - i64::from(entry.person.facemash_losses)
    );
  }
  assert_eq!(board.iter().map(|e| e.score).sum::<i64>(), 0);
}

#[tokio::test]
async fn leaderboard_sorts_by_score_with_stable_ties() {
  let e = engine();
  let a = add(&e, "A").await;
  let b = add(&e, "B").await;
  let c = add(&e, "C").await;
  let d = add(&e, "D").await;

  e.record_vote(c.id, a.id).await.unwrap();
  e.record_vote(c.id, b.id).await.unwrap();

  let board = e.leaderboard(DEFAULT_LEADERBOARD_LIMIT).await.unwrap();
  let rows: Vec<_> = board.iter().map(|r| (r.person.id, r.score)).collect();
  assert_eq!(rows, [(c.id, 2), (d.id, 0), (a.id, -1), (b.id, -1)]);

  assert_eq!(e.leaderboard(2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn person_stats_win_rate_and_standing() {
  let e = engine();
  let a = add(&e, "A").await;
  let b = add(&e, "B").await;

  let fresh = e.person_stats(a.id).await.unwrap();
  assert_eq!(fresh.total_votes, 0);
  assert_eq!(fresh.win_rate, 0.0);
  assert_eq!(fresh.standing, Standing::Weak);
  assert_eq!(fresh.tier, Tier::Pig);

  for _ in 0..3 {
    e.record_vote(a.id, b.id).await.unwrap();
  }
  e.record_vote(b.id, a.id).await.unwrap();
  e.record_rating(a.id, 5).await.unwrap();

  let stats = e.person_stats(a.id).await.unwrap();
  assert_eq!(stats.total_votes, 4);
  assert!((stats.win_rate - 75.0).abs() < 1e-9);
  assert_eq!(stats.standing, Standing::Star);
  assert_eq!(stats.tier, Tier::Emperor);

  assert_eq!(e.person_stats(b.id).await.unwrap().standing, Standing::Weak);
}

// ─── Search & stats ──────────────────────────────────────────────────────────

#[tokio::test]
async fn short_queries_match_nothing() {
  let e = engine();
  add(&e, "Ahmed").await;
  assert!(e.search("").await.unwrap().is_empty());
  assert!(e.search("a").await.unwrap().is_empty());
  assert!(e.search("  a  ").await.unwrap().is_empty());
  assert_eq!(e.search("ah").await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_matches_fields_case_insensitively() {
  let e = engine();
  let doc = e
    .create_person(&PersonDraft {
      name:        "Mohamed".into(),
      description: "Explains PHYSICS like a bedtime story".into(),
      category:    "doctors".into(),
      image_url:   "https://example.com/m.jpg".into(),
    })
    .await
    .unwrap();
  let student = add(&e, "Physics Fan").await;
  e.record_rating(doc.id, 2).await.unwrap();
  e.record_rating(student.id, 4).await.unwrap();

  let ids: Vec<_> = e.search("physics").await.unwrap().into_iter().map(|p| p.id).collect();
  assert_eq!(ids, [student.id, doc.id]);

  let by_category = e.search("DOCT").await.unwrap();
  assert_eq!(by_category.len(), 1);
  assert_eq!(by_category[0].id, doc.id);

  assert!(e.search("zz").await.unwrap().is_empty());
}

#[tokio::test]
async fn site_stats_on_empty_store() {
  let e = engine();
  let stats = e.site_stats().await.unwrap();
  assert_eq!(stats.total_people, 0);
  assert_eq!(stats.avg_rating, 0.0);
  assert_eq!(stats.top_category, None);
}

#[tokio::test]
async fn site_stats_rollup() {
  let e = engine();
  let d1 = e.create_person(&draft("D1", "doctors")).await.unwrap();
  let s1 = add(&e, "S1").await;
  e.create_person(&draft("D2", "doctors")).await.unwrap();
  add(&e, "S2").await;

  e.record_rating(d1.id, 5).await.unwrap();
  e.record_rating(d1.id, 2).await.unwrap();
  e.record_rating(s1.id, 2).await.unwrap();
  e.record_comment(s1.id, "hello").await.unwrap();
  e.record_vote(d1.id, s1.id).await.unwrap();

  let stats = e.site_stats().await.unwrap();
  assert_eq!(stats.total_people, 4);
  assert_eq!(stats.total_ratings, 3);
  assert_eq!(stats.total_comments, 1);
  assert_eq!(stats.total_facemash_votes, 1);
  assert!((stats.avg_rating - 3.0).abs() < 1e-9);
  // Two doctors, two students: doctors were seen first.
  assert_eq!(stats.top_category, Some(Category::Doctors));
}

// ─── End-to-end scenario ─────────────────────────────────────────────────────

#[tokio::test]
async fn rate_comment_vote_scenario() {
  let e = engine();
  let p1 = add(&e, "P1").await;

  e.record_rating(p1.id, 5).await.unwrap();
  let rated = e.record_rating(p1.id, 4).await.unwrap().person;
  assert_eq!(rated.average_rating, 4.5);
  assert_eq!(rated.rating_count, 2);

  let commented = e.record_comment(p1.id, "legend").await.unwrap().person;
  assert_eq!(commented.comments_count, 1);

  let p2 = add(&e, "P2").await;
  let voted = e.record_vote(p1.id, p2.id).await.unwrap();
  assert_eq!(voted.winner.facemash_wins, 1);
  assert_eq!(voted.loser.facemash_losses, 1);

  let board = e.leaderboard(DEFAULT_LEADERBOARD_LIMIT).await.unwrap();
  assert_eq!(board[0].person.id, p1.id);
  assert_eq!(board[0].score, 1);
  assert_eq!(board[1].person.id, p2.id);
  assert_eq!(board[1].score, -1);
}
