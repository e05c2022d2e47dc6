//! SQL schema for the kingship table.
//!
//! Executed once at connection startup. Column names mirror the record's
//! field names on the wire.

/// The single table every identity's record lives in.
pub const TABLE_NAME: &str = "KingOfTheRoom";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS KingOfTheRoom (
    NameId    TEXT PRIMARY KEY,
    CurrKing  TEXT NOT NULL,
    OldKing   TEXT NOT NULL,
    StartTime INTEGER NOT NULL   -- Unix seconds
);

PRAGMA user_version = 1;
";
