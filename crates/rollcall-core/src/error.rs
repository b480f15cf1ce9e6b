//! Error types for `rollcall-core`.

use thiserror::Error;

/// Why a guest row was rejected before reaching the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("guest name is empty")]
  EmptyName,

  #[error("guest seat is empty")]
  EmptySeat,
}
