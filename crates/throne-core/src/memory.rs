//! [`MemoryStore`] — a process-local [`KingshipStore`].
//!
//! Useful for tests and for running the skill without a database file.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex, PoisonError},
};

use crate::{record::KingshipRecord, store::KingshipStore};

/// Records held in a shared `HashMap`.
///
/// Cloning is cheap — clones share the same table. The number of `put` calls
/// is tracked so tests can assert that a request performed no write.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
  records: HashMap<String, KingshipRecord>,
  writes:  usize,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Total number of `put` calls served so far.
  pub fn writes(&self) -> usize {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner).writes
  }
}

impl KingshipStore for MemoryStore {
  type Error = Infallible;

  async fn get(&self, name_id: &str) -> Result<Option<KingshipRecord>, Infallible> {
    let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    Ok(inner.records.get(name_id).cloned())
  }

  async fn put(&self, record: KingshipRecord) -> Result<(), Infallible> {
    let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
    inner.writes += 1;
    inner.records.insert(record.name_id.clone(), record);
    Ok(())
  }
}
