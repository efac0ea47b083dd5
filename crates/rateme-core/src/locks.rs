//! Per-person write serialisation.
//!
//! Every read-modify-write of a person's derived fields runs while holding
//! that person's guard. Different people never contend. A slot lives only
//! while some task holds or waits on it, so the map never outgrows the set
//! of in-flight writes.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::person::PersonId;

type Slot = Arc<AsyncMutex<()>>;

/// The map mutex is synchronous and never held across an `.await`, which
/// lets [`PersonGuard`] release slots from `Drop`.
#[derive(Default)]
pub struct PersonLocks {
  slots: Mutex<HashMap<PersonId, Slot>>,
}

/// Held for the duration of one derived-field update.
pub struct PersonGuard<'a> {
  locks: &'a PersonLocks,
  /// `None` while the lock for that id is still being awaited.
  held:  Vec<(PersonId, Option<OwnedMutexGuard<()>>)>,
}

impl PersonLocks {
  pub fn new() -> Self { Self::default() }

  fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<PersonId, Slot>> {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn slot(&self, id: PersonId) -> Slot { self.slots().entry(id).or_default().clone() }

  /// Number of people with a live slot.
  #[cfg(test)]
  pub(crate) fn tracked(&self) -> usize { self.slots().len() }

  /// Lock one person.
  pub async fn lock(&self, id: PersonId) -> PersonGuard<'_> { self.lock_all(&[id]).await }

  /// Lock several people. Ids are locked in ascending order, so two callers
  /// locking overlapping sets cannot deadlock. Duplicates are locked once.
  pub async fn lock_all(&self, ids: &[PersonId]) -> PersonGuard<'_> {
    let mut ordered = ids.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let mut guard = PersonGuard {
      locks: self,
      held:  Vec::with_capacity(ordered.len()),
    };
    for id in ordered {
      // Registered before the await so a cancelled caller still releases it.
      guard.held.push((id, None));
      let owned = self.slot(id).lock_owned().await;
      if let Some((_, held)) = guard.held.last_mut() {
        *held = Some(owned);
      }
    }
    guard
  }
}

impl Drop for PersonGuard<'_> {
  fn drop(&mut self) {
    for (id, held) in self.held.drain(..) {
      drop(held);
      let mut slots = self.locks.slots();
      // Waiters clone the slot under this same map lock, so a count of one
      // means nobody else can reach it.
      if slots.get(&id).is_some_and(|s| Arc::strong_count(s) == 1) {
        slots.remove(&id);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use super::*;

  #[tokio::test]
  async fn same_person_is_exclusive() {
    let locks = Arc::new(PersonLocks::new());
    let held = locks.lock(1).await;

    let l = locks.clone();
    let waiter = tokio::spawn(async move {
      let _g = l.lock(1).await;
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());

    drop(held);
    waiter.await.unwrap();
    assert_eq!(locks.tracked(), 0);
  }

  #[tokio::test]
  async fn different_people_do_not_contend() {
    let locks = PersonLocks::new();
    let _a = locks.lock(1).await;
    let b = tokio::time::timeout(Duration::from_millis(100), locks.lock(2)).await;
    assert!(b.is_ok());
  }

  #[tokio::test]
  async fn lock_all_tolerates_duplicates_and_order() {
    let locks = PersonLocks::new();
    let g = locks.lock_all(&[3, 1, 3]).await;
    assert_eq!(locks.tracked(), 2);
    drop(g);
    let _g = locks.lock_all(&[1, 3]).await;
  }

  #[tokio::test]
  async fn released_slots_are_removed() {
    let locks = PersonLocks::new();
    for id in 0..100 {
      let _g = locks.lock(id).await;
    }
    assert_eq!(locks.tracked(), 0);
  }

  #[tokio::test]
  async fn slot_survives_while_someone_waits() {
    let locks = Arc::new(PersonLocks::new());
    let first = locks.lock(7).await;

    let l = locks.clone();
    let waiter = tokio::spawn(async move {
      let _g = l.lock(7).await;
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    drop(first);
    assert!(locks.tracked() <= 1);
    waiter.await.unwrap();
    assert_eq!(locks.tracked(), 0);
  }
}
