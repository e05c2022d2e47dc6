//! The `KingshipStore` trait.
//!
//! Implemented by storage backends (e.g. `throne-store-sqlite`, or the
//! in-memory [`MemoryStore`](crate::memory::MemoryStore)). The state machine
//! in [`Throne`](crate::Throne) depends on this abstraction only.

use std::future::Future;

use crate::record::KingshipRecord;

/// A key-value table of [`KingshipRecord`]s keyed by identity.
///
/// The store offers no locking or versioning: two concurrent `put`s for the
/// same identity race and the last one wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait KingshipStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch the record for `name_id`. `Ok(None)` means "not found"; a backend
  /// failure is always an `Err`.
  fn get<'a>(
    &'a self,
    name_id: &'a str,
  ) -> impl Future<Output = Result<Option<KingshipRecord>, Self::Error>> + Send + 'a;

  /// Unconditionally upsert `record`, replacing whatever was stored under
  /// its `name_id`.
  fn put(
    &self,
    record: KingshipRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
