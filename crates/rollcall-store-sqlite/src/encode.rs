//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; the check-in flag as `0`/`1`.

use chrono::{DateTime, Utc};
use rollcall_core::guest::{Guest, Identifier};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawGuest::from_row`].
pub const GUEST_COLUMNS: &str =
  "id, identifier, name, contact, seat, checked_in, checked_in_at";

/// Raw values read directly from a `guests` row.
pub struct RawGuest {
  pub id:            i64,
  pub identifier:    String,
  pub name:          String,
  pub contact:       Option<String>,
  pub seat:          String,
  pub checked_in:    bool,
  pub checked_in_at: Option<String>,
}

impl RawGuest {
  /// Read a row selected with [`GUEST_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      identifier:    row.get(1)?,
      name:          row.get(2)?,
      contact:       row.get(3)?,
      seat:          row.get(4)?,
      checked_in:    row.get(5)?,
      checked_in_at: row.get(6)?,
    })
  }

  pub fn into_guest(self) -> Result<Guest> {
    Ok(Guest {
      id:            self.id,
      identifier:    Identifier::new(self.identifier),
      name:          self.name,
      contact:       self.contact,
      seat:          self.seat,
      checked_in:    self.checked_in,
      checked_in_at: self.checked_in_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}
