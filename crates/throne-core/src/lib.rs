//! Core types and trait definitions for the king-of-the-room skill.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! storage backend and the clock are capabilities handed to [`Throne`], so
//! every caller (and every test) decides what "persisted" and "now" mean.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod clock;
pub mod duration;
pub mod error;
pub mod memory;
pub mod record;
pub mod store;
pub mod throne;

pub use error::{Error, Result};
pub use throne::{Coronation, KingName, Reign, Throne};
