//! Guest types, the registry trait, and the check-in gate for Rollcall.
//!
//! No HTTP or database code lives here; storage backends and the API layer
//! build on these definitions.

pub mod error;
pub mod gate;
pub mod guest;
pub mod registry;

pub use error::ValidationError;
pub use gate::CheckInGate;
