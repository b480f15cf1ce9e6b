//! [`SqliteRegistry`], the SQLite implementation of [`GuestRegistry`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};

use rollcall_core::{
  guest::{
    BulkLoadSummary, CheckInResult, Guest, GuestRow, Identifier, NewGuest,
    Stats, validate_rows,
  },
  registry::GuestRegistry,
};

use crate::{
  encode::{GUEST_COLUMNS, RawGuest, encode_dt},
  schema::SCHEMA,
  Error, Result,
};

/// How long a statement waits on another connection's write lock before
/// failing with `SQLITE_BUSY`.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Registry ────────────────────────────────────────────────────────────────

/// A guest registry backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteRegistry {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRegistry {
  /// Open (or create) a registry at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let registry = Self { conn };
    registry.init_schema().await?;
    Ok(registry)
  }

  /// Open an in-memory registry, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let registry = Self { conn };
    registry.init_schema().await?;
    Ok(registry)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
          row.get::<_, String>(0)
        })?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GuestRegistry impl ──────────────────────────────────────────────────────

impl GuestRegistry for SqliteRegistry {
  type Error = Error;

  // ── Roster management ─────────────────────────────────────────────────────

  async fn clear_all(&self) -> Result<()> {
    let deleted = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM guests", [])?))
      .await?;
    tracing::debug!(deleted, "cleared guest registry");
    Ok(())
  }

  async fn bulk_load(&self, rows: Vec<GuestRow>) -> Result<BulkLoadSummary> {
    let (accepted, skipped) = validate_rows(rows);
    let records: Vec<_> = accepted
      .into_iter()
      .map(|g| {
        (
          Identifier::generate().as_str().to_owned(),
          g.name().to_owned(),
          g.contact().map(str::to_owned),
          g.seat().to_owned(),
        )
      })
      .collect();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO guests (identifier, name, contact, seat) VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (identifier, name, contact, seat) in &records {
            stmt.execute(rusqlite::params![identifier, name, contact, seat])?;
          }
        }
        tx.commit()?;
        Ok(records.len())
      })
      .await?;

    tracing::debug!(inserted, skipped, "bulk-loaded guests");
    Ok(BulkLoadSummary { inserted, skipped })
  }

  async fn add_guest(&self, guest: NewGuest) -> Result<Guest> {
    let identifier = Identifier::generate();

    let ident   = identifier.as_str().to_owned();
    let name    = guest.name().to_owned();
    let contact = guest.contact().map(str::to_owned);
    let seat    = guest.seat().to_owned();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO guests (identifier, name, contact, seat) VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![ident, name, contact, seat],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Guest {
      id,
      identifier,
      name: guest.name().to_owned(),
      contact: guest.contact().map(str::to_owned),
      seat: guest.seat().to_owned(),
      checked_in: false,
      checked_in_at: None,
    })
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_by_identifier(&self, identifier: &Identifier) -> Result<Option<Guest>> {
    let ident = identifier.as_str().to_owned();

    let raw: Option<RawGuest> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE identifier = ?1"),
            rusqlite::params![ident],
            RawGuest::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawGuest::into_guest).transpose()
  }

  async fn list_all(&self) -> Result<Vec<Guest>> {
    let raws: Vec<RawGuest> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {GUEST_COLUMNS} FROM guests ORDER BY name, id"))?;
        let rows = stmt
          .query_map([], RawGuest::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawGuest::into_guest).collect()
  }

  async fn stats(&self) -> Result<Stats> {
    let (total, checked_in): (i64, i64) = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*), COALESCE(SUM(checked_in), 0) FROM guests",
          [],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?)
      })
      .await?;

    Ok(Stats::from_counts(total as u64, checked_in as u64))
  }

  // ── Check-in state ────────────────────────────────────────────────────────

  async fn try_check_in(&self, identifier: &Identifier) -> Result<CheckInResult> {
    let ident = identifier.as_str().to_owned();
    let now   = encode_dt(Utc::now());

    // The guarded UPDATE is the transition itself: at most one statement can
    // ever change a row from 0 to 1. The follow-up SELECT runs under the same
    // write lock, so it sees exactly the state this call left behind.
    let (transitioned, raw): (bool, Option<RawGuest>) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let changed = tx.execute(
          "UPDATE guests SET checked_in = 1, checked_in_at = ?1
           WHERE identifier = ?2 AND checked_in = 0",
          rusqlite::params![now, ident],
        )?;
        let raw = tx
          .query_row(
            &format!("SELECT {GUEST_COLUMNS} FROM guests WHERE identifier = ?1"),
            rusqlite::params![ident],
            RawGuest::from_row,
          )
          .optional()?;
        tx.commit()?;
        Ok((changed == 1, raw))
      })
      .await?;

    Ok(match raw {
      None => CheckInResult::NotFound,
      Some(raw) if transitioned => CheckInResult::FirstTime(raw.into_guest()?),
      Some(raw) => CheckInResult::AlreadyUsed(raw.into_guest()?),
    })
  }

  async fn reset_all_check_ins(&self) -> Result<u64> {
    let previously_checked_in: i64 = self
      .conn
      .call(|conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let count: i64 = tx.query_row(
          "SELECT COUNT(*) FROM guests WHERE checked_in = 1",
          [],
          |row| row.get(0),
        )?;
        tx.execute("UPDATE guests SET checked_in = 0, checked_in_at = NULL", [])?;
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(previously_checked_in as u64)
  }
}
