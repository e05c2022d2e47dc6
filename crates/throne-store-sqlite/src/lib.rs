//! SQLite backend for the king-of-the-room skill.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use schema::TABLE_NAME;
pub use store::SqliteStore;
