//! The guest record and the values that flow in and out of a registry.
//!
//! Rows arrive untyped from an upload ([`GuestRow`]), are validated into a
//! [`NewGuest`], and only then handed to a registry which assigns the
//! [`Identifier`] and persists a [`Guest`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationError;

// ─── Identifier ──────────────────────────────────────────────────────────────

/// The opaque token printed in a guest's code and used in URLs.
///
/// Freshly generated identifiers are random (UUID v4) and therefore
/// unguessable, but the type treats any string as a candidate so that scanned
/// garbage can be looked up and rejected like any other unknown code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
  /// Generate a fresh 128-bit random identifier.
  pub fn generate() -> Self { Self(Uuid::new_v4().hyphenated().to_string()) }

  pub fn new(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Identifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Input rows ──────────────────────────────────────────────────────────────

/// A raw `(name, contact, seat)` triple as produced by a roster parser.
/// Nothing about it has been checked yet; absent fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuestRow {
  pub name:    String,
  pub contact: String,
  pub seat:    String,
}

impl GuestRow {
  pub fn new(
    name: impl Into<String>,
    contact: impl Into<String>,
    seat: impl Into<String>,
  ) -> Self {
    Self { name: name.into(), contact: contact.into(), seat: seat.into() }
  }
}

/// A validated guest ready for insertion: trimmed, with non-empty name and
/// seat. An empty contact is normalised to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
  name:    String,
  contact: Option<String>,
  seat:    String,
}

impl NewGuest {
  pub fn name(&self) -> &str { &self.name }

  pub fn contact(&self) -> Option<&str> { self.contact.as_deref() }

  pub fn seat(&self) -> &str { &self.seat }
}

impl TryFrom<GuestRow> for NewGuest {
  type Error = ValidationError;

  fn try_from(row: GuestRow) -> Result<Self, Self::Error> {
    let name = row.name.trim();
    if name.is_empty() {
      return Err(ValidationError::EmptyName);
    }
    let seat = row.seat.trim();
    if seat.is_empty() {
      return Err(ValidationError::EmptySeat);
    }
    let contact = row.contact.trim();

    Ok(Self {
      name:    name.to_owned(),
      contact: (!contact.is_empty()).then(|| contact.to_owned()),
      seat:    seat.to_owned(),
    })
  }
}

/// Validate a batch of rows, dropping malformed ones.
///
/// Returns the accepted guests in input order and the number of rows skipped.
pub fn validate_rows(rows: Vec<GuestRow>) -> (Vec<NewGuest>, usize) {
  let mut accepted = Vec::with_capacity(rows.len());
  let mut skipped = 0;
  for row in rows {
    match NewGuest::try_from(row) {
      Ok(guest) => accepted.push(guest),
      Err(_) => skipped += 1,
    }
  }
  (accepted, skipped)
}

// ─── Stored guest ────────────────────────────────────────────────────────────

/// A persisted guest record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
  /// Storage surrogate key; never part of the external representation.
  #[serde(skip)]
  pub id:            i64,
  pub identifier:    Identifier,
  pub name:          String,
  pub contact:       Option<String>,
  pub seat:          String,
  pub checked_in:    bool,
  /// Set exactly once, when `checked_in` goes from false to true.
  pub checked_in_at: Option<DateTime<Utc>>,
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// Outcome of the registry's atomic check-in transition.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInResult {
  /// No guest carries this identifier.
  NotFound,
  /// This call performed the false→true transition.
  FirstTime(Guest),
  /// The guest had already been checked in, by this or an earlier call.
  AlreadyUsed(Guest),
}

/// Counts returned by a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkLoadSummary {
  pub inserted: usize,
  /// Rows rejected for an empty name or seat.
  pub skipped:  usize,
}

/// Check-in progress across the whole registry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
  pub total:      u64,
  pub checked_in: u64,
  pub pending:    u64,
  /// Share of guests checked in, in percent, rounded to one decimal with
  /// ties going to the even digit.
  pub percentage: f64,
}

impl Stats {
  pub fn from_counts(total: u64, checked_in: u64) -> Self {
    let percentage = if total > 0 {
      (checked_in as f64 / total as f64 * 1000.0).round_ties_even() / 10.0
    } else {
      0.0
    };
    Self {
      total,
      checked_in,
      pending: total.saturating_sub(checked_in),
      percentage,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_guest_trims_fields() {
    let guest =
      NewGuest::try_from(GuestRow::new("  Ana ", " ana@example.com ", " A1"))
        .unwrap();
    assert_eq!(guest.name(), "Ana");
    assert_eq!(guest.contact(), Some("ana@example.com"));
    assert_eq!(guest.seat(), "A1");
  }

  #[test]
  fn blank_contact_becomes_none() {
    let guest = NewGuest::try_from(GuestRow::new("Ana", "   ", "A1")).unwrap();
    assert_eq!(guest.contact(), None);
  }

  #[test]
  fn whitespace_name_or_seat_is_rejected() {
    assert_eq!(
      NewGuest::try_from(GuestRow::new("  ", "", "A1")),
      Err(ValidationError::EmptyName)
    );
    assert_eq!(
      NewGuest::try_from(GuestRow::new("Ana", "", "\t")),
      Err(ValidationError::EmptySeat)
    );
  }

  #[test]
  fn validate_rows_counts_skips() {
    let (accepted, skipped) = validate_rows(vec![
      GuestRow::new("Ana", "", "A1"),
      GuestRow::new("", "", "B2"),
      GuestRow::new("Bob", "", "B3"),
      GuestRow::new("Cid", "", ""),
    ]);
    assert_eq!(skipped, 2);
    let names: Vec<_> = accepted.iter().map(NewGuest::name).collect();
    assert_eq!(names, ["Ana", "Bob"]);
  }

  #[test]
  fn generated_identifiers_are_distinct() {
    let a = Identifier::generate();
    let b = Identifier::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
  }

  #[test]
  fn stats_rounds_to_one_decimal() {
    let stats = Stats::from_counts(3, 1);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.checked_in, 1);
    assert_eq!(stats.pending, 2);
    assert_eq!(stats.percentage, 33.3);

    assert_eq!(Stats::from_counts(3, 2).percentage, 66.7);
    assert_eq!(Stats::from_counts(4, 4).percentage, 100.0);
    assert_eq!(Stats::from_counts(16, 1).percentage, 6.2);
    assert_eq!(Stats::from_counts(16, 3).percentage, 18.8);
  }

  #[test]
  fn stats_of_empty_registry_is_zero() {
    let stats = Stats::from_counts(0, 0);
    assert_eq!(stats.pending, 0);
    assert_eq!(stats.percentage, 0.0);
  }

  #[test]
  fn missing_row_fields_deserialize_as_empty() {
    let row: GuestRow = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
    assert_eq!(row, GuestRow::new("Ana", "", ""));
    assert_eq!(NewGuest::try_from(row), Err(ValidationError::EmptySeat));
  }

  #[test]
  fn guest_serialization_hides_surrogate_key() {
    let guest = Guest {
      id:            42,
      identifier:    Identifier::new("abc"),
      name:          "Ana".into(),
      contact:       None,
      seat:          "A1".into(),
      checked_in:    false,
      checked_in_at: None,
    };
    let json = serde_json::to_value(&guest).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["identifier"], "abc");
  }
}
