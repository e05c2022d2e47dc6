//! [`SqliteStore`] — the SQLite implementation of [`KingshipStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use throne_core::{record::KingshipRecord, store::KingshipStore};

use crate::{Error, Result, encode::RawRecord, schema::SCHEMA};

/// A kingship table backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl KingshipStore for SqliteStore {
  type Error = Error;

  async fn get(&self, name_id: &str) -> Result<Option<KingshipRecord>> {
    let key = name_id.to_owned();

    let raw: Option<RawRecord> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            "SELECT NameId, CurrKing, OldKing, StartTime
               FROM KingOfTheRoom WHERE NameId = ?1",
            rusqlite::params![key],
            RawRecord::from_row,
          )
          .optional()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn put(&self, record: KingshipRecord) -> Result<()> {
    let raw = RawRecord::from_record(&record);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO KingOfTheRoom (NameId, CurrKing, OldKing, StartTime)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (NameId) DO UPDATE SET
             CurrKing  = excluded.CurrKing,
             OldKing   = excluded.OldKing,
             StartTime = excluded.StartTime",
          rusqlite::params![raw.name_id, raw.curr_king, raw.old_king, raw.start_time],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
