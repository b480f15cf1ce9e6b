//! SQL schema for the Rollcall SQLite registry.
//!
//! Executed once at connection startup, after the journal mode is switched to
//! WAL.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS guests (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    identifier    TEXT    NOT NULL UNIQUE,  -- opaque token printed in the code
    name          TEXT    NOT NULL,
    contact       TEXT,
    seat          TEXT    NOT NULL,
    checked_in    INTEGER NOT NULL DEFAULT 0,
    checked_in_at TEXT,                     -- RFC 3339 UTC; set on first check-in
    CHECK (checked_in IN (0, 1)),
    CHECK ((checked_in = 0) = (checked_in_at IS NULL))
);

CREATE INDEX IF NOT EXISTS guests_name_idx ON guests(name);

PRAGMA user_version = 1;
";
