//! The `GuestRegistry` trait.
//!
//! The trait is implemented by storage backends (e.g. `rollcall-store-sqlite`).
//! Higher layers (the check-in gate, `rollcall-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::guest::{
  BulkLoadSummary, CheckInResult, Guest, GuestRow, Identifier, NewGuest, Stats,
};

/// Durable storage of guest records with one safety-critical primitive,
/// [`GuestRegistry::try_check_in`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GuestRegistry: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Roster management ─────────────────────────────────────────────────

  /// Delete every guest. Idempotent.
  fn clear_all(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert every well-formed row under a freshly generated identifier.
  ///
  /// Rows with an empty name or seat (after trimming) are skipped and counted
  /// in [`BulkLoadSummary::skipped`]. Existing guests are left alone; callers
  /// wanting replace semantics call [`GuestRegistry::clear_all`] first.
  fn bulk_load(
    &self,
    rows: Vec<GuestRow>,
  ) -> impl Future<Output = Result<BulkLoadSummary, Self::Error>> + Send + '_;

  /// Insert a single, already validated guest.
  fn add_guest(
    &self,
    guest: NewGuest,
  ) -> impl Future<Output = Result<Guest, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a guest by identifier. Returns `None` if not found.
  fn find_by_identifier(
    &self,
    identifier: &Identifier,
  ) -> impl Future<Output = Result<Option<Guest>, Self::Error>> + Send;

  /// All guests, sorted by name ascending.
  fn list_all(&self) -> impl Future<Output = Result<Vec<Guest>, Self::Error>> + Send + '_;

  fn stats(&self) -> impl Future<Output = Result<Stats, Self::Error>> + Send + '_;

  // ── Check-in state ────────────────────────────────────────────────────

  /// Atomically mark the guest as checked in if, and only if, they are not
  /// already.
  ///
  /// For a given identifier, exactly one call ever observes
  /// [`CheckInResult::FirstTime`] (until the next reset); every other call,
  /// concurrent or not, observes [`CheckInResult::AlreadyUsed`].
  fn try_check_in(
    &self,
    identifier: &Identifier,
  ) -> impl Future<Output = Result<CheckInResult, Self::Error>> + Send;

  /// Clear the check-in state of every guest. Returns how many guests were
  /// checked in before the reset.
  fn reset_all_check_ins(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
