//! Encoding and decoding between [`KingshipRecord`] and the columns of the
//! `KingOfTheRoom` table.
//!
//! `StartTime` is stored as integer Unix seconds; everything else is text.

use chrono::{DateTime, Utc};
use throne_core::{record::KingshipRecord, throne::start_time_from_unix};

use crate::Result;

pub fn encode_start_time(at: DateTime<Utc>) -> i64 { at.timestamp() }

pub fn decode_start_time(secs: i64) -> Result<DateTime<Utc>> {
  Ok(start_time_from_unix(secs)?)
}

/// Raw values read directly from a `KingOfTheRoom` row.
pub struct RawRecord {
  pub name_id:    String,
  pub curr_king:  String,
  pub old_king:   String,
  pub start_time: i64,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name_id:    row.get("NameId")?,
      curr_king:  row.get("CurrKing")?,
      old_king:   row.get("OldKing")?,
      start_time: row.get("StartTime")?,
    })
  }

  pub fn from_record(record: &KingshipRecord) -> Self {
    Self {
      name_id:    record.name_id.clone(),
      curr_king:  record.curr_king.clone(),
      old_king:   record.old_king.clone(),
      start_time: encode_start_time(record.start_time),
    }
  }

  pub fn into_record(self) -> Result<KingshipRecord> {
    Ok(KingshipRecord {
      name_id:    self.name_id,
      curr_king:  self.curr_king,
      old_king:   self.old_king,
      start_time: decode_start_time(self.start_time)?,
    })
  }
}
