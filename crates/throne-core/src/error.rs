//! Error types for `throne-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("a king needs a name")]
  EmptyName,

  #[error("timestamp out of range: {0}")]
  InvalidTimestamp(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
