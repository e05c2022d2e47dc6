//! The kingship state machine.
//!
//! [`Throne`] reads and writes one [`KingshipRecord`] per identity through an
//! injected [`KingshipStore`], stamping reign start times from an injected
//! [`Clock`].

use chrono::{DateTime, TimeZone, Utc};

use crate::{
  Error, Result,
  clock::Clock,
  record::{KingshipRecord, NOBODY},
  store::KingshipStore,
};

// ─── Candidate names ─────────────────────────────────────────────────────────

/// A non-empty, trimmed claimant to the throne.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingName(String);

impl KingName {
  pub fn new(name: &str) -> Result<Self> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::EmptyName);
    }
    Ok(Self(name.to_owned()))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// A throne that is currently occupied, as seen at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reign {
  pub record:  KingshipRecord,
  /// Seconds since `record.start_time`. Clamped to zero if the stored start
  /// lies in the future.
  pub elapsed: u64,
}

/// The result of asking to crown someone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coronation {
  /// The record was written; `record` is what is now stored.
  Crowned { record: KingshipRecord },
  /// The candidate already holds the title. Nothing was written.
  AlreadyInPower { king: String },
}

// ─── State machine ───────────────────────────────────────────────────────────

/// Per-identity "king of the room" bookkeeping.
#[derive(Debug, Clone)]
pub struct Throne<S, C> {
  store: S,
  clock: C,
}

impl<S, C> Throne<S, C>
where
  S: KingshipStore,
  C: Clock,
{
  pub fn new(store: S, clock: C) -> Self { Self { store, clock } }

  /// Look up who reigns for `name_id`. `Ok(None)` is the empty throne.
  pub async fn reign(&self, name_id: &str) -> Result<Option<Reign>, S::Error> {
    let Some(record) = self.store.get(name_id).await? else {
      return Ok(None);
    };

    let elapsed = self
      .clock
      .now()
      .signed_duration_since(record.start_time)
      .num_seconds()
      .max(0) as u64;

    Ok(Some(Reign { record, elapsed }))
  }

  /// Make `candidate` king for `name_id`.
  ///
  /// The previous king (or [`NOBODY`]) moves into `old_king` and the reign
  /// clock restarts. Crowning the reigning king is rejected without a write.
  pub async fn crown(
    &self,
    name_id: &str,
    candidate: &KingName,
  ) -> Result<Coronation, S::Error> {
    let previous = self.store.get(name_id).await?;

    let old_king = match previous {
      Some(record) if record.is_reigning(candidate.as_str()) => {
        return Ok(Coronation::AlreadyInPower { king: record.curr_king });
      }
      Some(record) => record.curr_king,
      None => NOBODY.to_owned(),
    };

    let record = KingshipRecord {
      name_id: name_id.to_owned(),
      curr_king: candidate.as_str().to_owned(),
      old_king,
      start_time: whole_seconds(self.clock.now()),
    };
    self.store.put(record.clone()).await?;

    Ok(Coronation::Crowned { record })
  }
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

/// Decode a stored Unix timestamp (seconds).
pub fn start_time_from_unix(secs: i64) -> Result<DateTime<Utc>> {
  Utc
    .timestamp_opt(secs, 0)
    .single()
    .ok_or(Error::InvalidTimestamp(secs))
}

fn whole_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
  // Always representable: the same instant with the sub-second part dropped.
  start_time_from_unix(at.timestamp()).unwrap_or(at)
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;
  use crate::{clock::FixedClock, memory::MemoryStore};

  fn t0() -> DateTime<Utc> { Utc.timestamp_opt(1_700_000_000, 0).unwrap() }

  fn throne_at(store: &MemoryStore, at: DateTime<Utc>) -> Throne<MemoryStore, FixedClock> {
    Throne::new(store.clone(), FixedClock(at))
  }

  fn name(n: &str) -> KingName { KingName::new(n).unwrap() }

  #[test]
  fn empty_names_are_rejected() {
    assert!(matches!(KingName::new(""), Err(Error::EmptyName)));
    assert!(matches!(KingName::new("   "), Err(Error::EmptyName)));
    assert_eq!(name("  Alice ").as_str(), "Alice");
  }

  #[tokio::test]
  async fn empty_throne_reads_none_without_writing() {
    let store = MemoryStore::new();
    let throne = throne_at(&store, t0());

    assert!(throne.reign("u1").await.unwrap().is_none());
    assert_eq!(store.writes(), 0);
  }

  #[tokio::test]
  async fn first_coronation_usurps_nobody() {
    let store = MemoryStore::new();
    let throne = throne_at(&store, t0());

    let outcome = throne.crown("u1", &name("Alice")).await.unwrap();
    let Coronation::Crowned { record } = outcome else {
      panic!("expected a coronation, got {outcome:?}");
    };
    assert_eq!(record.curr_king, "Alice");
    assert_eq!(record.old_king, NOBODY);
    assert_eq!(record.start_time, t0());
    assert_eq!(store.get("u1").await.unwrap(), Some(record));
  }

  #[tokio::test]
  async fn crowning_the_reigning_king_is_a_no_op() {
    let store = MemoryStore::new();
    throne_at(&store, t0()).crown("u1", &name("Alice")).await.unwrap();

    let later = throne_at(&store, t0() + Duration::hours(3));
    let outcome = later.crown("u1", &name("Alice")).await.unwrap();

    assert_eq!(outcome, Coronation::AlreadyInPower { king: "Alice".into() });
    assert_eq!(store.writes(), 1);
    let record = store.get("u1").await.unwrap().unwrap();
    assert_eq!(record.start_time, t0());
  }

  #[tokio::test]
  async fn a_new_king_shifts_the_old_one_and_restarts_the_clock() {
    let store = MemoryStore::new();
    throne_at(&store, t0()).crown("u1", &name("Alice")).await.unwrap();

    let later_at = t0() + Duration::minutes(5);
    throne_at(&store, later_at).crown("u1", &name("Bob")).await.unwrap();

    let record = store.get("u1").await.unwrap().unwrap();
    assert_eq!(record.curr_king, "Bob");
    assert_eq!(record.old_king, "Alice");
    assert_eq!(record.start_time, later_at);
  }

  #[tokio::test]
  async fn name_comparison_is_case_sensitive() {
    let store = MemoryStore::new();
    let throne = throne_at(&store, t0());
    throne.crown("u1", &name("Alice")).await.unwrap();

    let outcome = throne.crown("u1", &name("alice")).await.unwrap();
    assert!(matches!(outcome, Coronation::Crowned { .. }));
  }

  #[tokio::test]
  async fn identities_are_independent() {
    let store = MemoryStore::new();
    let throne = throne_at(&store, t0());
    throne.crown("u1", &name("Alice")).await.unwrap();

    assert!(throne.reign("u2").await.unwrap().is_none());
    let outcome = throne.crown("u2", &name("Alice")).await.unwrap();
    assert!(matches!(outcome, Coronation::Crowned { .. }));
  }

  #[tokio::test]
  async fn reign_reports_elapsed_seconds() {
    let store = MemoryStore::new();
    throne_at(&store, t0()).crown("u1", &name("Alice")).await.unwrap();

    let reign = throne_at(&store, t0() + Duration::seconds(90_061))
      .reign("u1")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(reign.elapsed, 90_061);
    assert_eq!(reign.record.curr_king, "Alice");
  }

  #[tokio::test]
  async fn start_times_in_the_future_clamp_to_zero() {
    let store = MemoryStore::new();
    throne_at(&store, t0()).crown("u1", &name("Alice")).await.unwrap();

    let reign = throne_at(&store, t0() - Duration::seconds(30))
      .reign("u1")
      .await
      .unwrap()
      .unwrap();
    assert_eq!(reign.elapsed, 0);
  }

  #[tokio::test]
  async fn sub_second_precision_is_dropped() {
    let store = MemoryStore::new();
    let at = t0() + Duration::milliseconds(750);
    throne_at(&store, at).crown("u1", &name("Alice")).await.unwrap();

    let record = store.get("u1").await.unwrap().unwrap();
    assert_eq!(record.start_time, t0());
  }

  #[test]
  fn out_of_range_timestamps_fail_to_decode() {
    assert!(matches!(
      start_time_from_unix(i64::MAX),
      Err(Error::InvalidTimestamp(i64::MAX))
    ));
    assert_eq!(start_time_from_unix(1_700_000_000).unwrap(), t0());
  }
}
