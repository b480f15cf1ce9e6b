//! The check-in gate: turns a raw scan payload into a [`ScanResponse`].
//!
//! The gate's only interaction with mutable state is
//! [`GuestRegistry::try_check_in`]; the single-use guarantee lives entirely in
//! the registry. The gate's job is classification and failure containment:
//! it never returns an error to its caller.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
  guest::{CheckInResult, Guest, Identifier},
  registry::GuestRegistry,
};

// ─── Response ────────────────────────────────────────────────────────────────

/// The class a scan attempt falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
  /// First use of a known code; entry granted.
  Valid,
  /// Known code that has been used before; entry refused.
  AlreadyUsed,
  /// Unknown code.
  Invalid,
  /// Nothing was scanned.
  EmptyCode,
  /// The registry could not be consulted.
  Error,
}

impl ScanStatus {
  /// Short, staff-readable text shown on the scanner.
  pub fn message(self) -> &'static str {
    match self {
      Self::Valid => "WELCOME!",
      Self::AlreadyUsed => "TICKET ALREADY USED",
      Self::Invalid => "INVALID CODE",
      Self::EmptyCode => "EMPTY CODE",
      Self::Error => "CHECK-IN UNAVAILABLE, TRY AGAIN",
    }
  }
}

/// Who the scanned code belongs to, as shown to door staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
  pub name:          String,
  pub seat:          String,
  /// When the guest was (first) checked in.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub checked_in_at: Option<DateTime<Utc>>,
}

impl From<Guest> for Badge {
  fn from(guest: Guest) -> Self {
    Self {
      name:          guest.name,
      seat:          guest.seat,
      checked_in_at: guest.checked_in_at,
    }
  }
}

/// The gate's verdict on one scan.
///
/// Guest data is only present for [`ScanStatus::Valid`] and
/// [`ScanStatus::AlreadyUsed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResponse {
  pub status:  ScanStatus,
  pub message: String,
  #[serde(flatten)]
  pub guest:   Option<Badge>,
}

impl ScanResponse {
  /// The response for a scan that could not be processed at all.
  pub fn unavailable() -> Self { Self::bare(ScanStatus::Error) }

  fn bare(status: ScanStatus) -> Self {
    Self { status, message: status.message().to_owned(), guest: None }
  }

  fn with_guest(status: ScanStatus, guest: Guest) -> Self {
    Self {
      status,
      message: status.message().to_owned(),
      guest: Some(guest.into()),
    }
  }
}

// ─── Gate ────────────────────────────────────────────────────────────────────

/// Validates scanned codes against a shared [`GuestRegistry`].
pub struct CheckInGate<R> {
  registry: Arc<R>,
}

impl<R> Clone for CheckInGate<R> {
  fn clone(&self) -> Self { Self { registry: Arc::clone(&self.registry) } }
}

impl<R: GuestRegistry> CheckInGate<R> {
  pub fn new(registry: Arc<R>) -> Self { Self { registry } }

  /// Classify a raw scan payload, checking the guest in on first use.
  pub async fn validate(&self, raw_code: &str) -> ScanResponse {
    let code = raw_code.trim();
    if code.is_empty() {
      return ScanResponse::bare(ScanStatus::EmptyCode);
    }

    let identifier = Identifier::new(code);
    let response = match self.registry.try_check_in(&identifier).await {
      Ok(CheckInResult::FirstTime(guest)) => {
        ScanResponse::with_guest(ScanStatus::Valid, guest)
      }
      Ok(CheckInResult::AlreadyUsed(guest)) => {
        ScanResponse::with_guest(ScanStatus::AlreadyUsed, guest)
      }
      Ok(CheckInResult::NotFound) => ScanResponse::bare(ScanStatus::Invalid),
      Err(e) => {
        tracing::error!(error = %e, "check-in failed");
        ScanResponse::unavailable()
      }
    };

    tracing::debug!(status = ?response.status, "scan classified");
    response
  }
}
