//! The per-identity kingship record.
//!
//! Exactly one record exists per identity key. It is created by the first
//! successful coronation and overwritten in place by every later one; nothing
//! in this system deletes it.

use chrono::{DateTime, Utc};

/// Placeholder prior holder for a throne that had never been claimed.
pub const NOBODY: &str = "nobody";

/// Who holds the title for one identity, who held it before, and since when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KingshipRecord {
  /// The caller identity this record belongs to (the primary key).
  pub name_id:    String,
  pub curr_king:  String,
  /// The immediately preceding holder, or [`NOBODY`].
  pub old_king:   String,
  /// When `curr_king` took the throne. Whole seconds only.
  pub start_time: DateTime<Utc>,
}

impl KingshipRecord {
  /// Whether `candidate` is the reigning king.
  pub fn is_reigning(&self, candidate: &str) -> bool {
    self.curr_king == candidate
  }
}
