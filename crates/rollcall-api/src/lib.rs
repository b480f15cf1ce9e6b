//! JSON REST API for Rollcall.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rollcall_core::registry::GuestRegistry`]. TLS and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rollcall_api::api_router(registry.clone()))
//! ```

pub mod admin;
pub mod error;
pub mod guests;
pub mod qr;
pub mod roster;
pub mod scan;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use rollcall_core::{CheckInGate, registry::GuestRegistry};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<R> {
  pub registry: Arc<R>,
  pub gate:     CheckInGate<R>,
}

impl<R> Clone for ApiState<R> {
  fn clone(&self) -> Self {
    Self { registry: Arc::clone(&self.registry), gate: self.gate.clone() }
  }
}

/// Build a fully-materialised API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<R>(registry: Arc<R>) -> Router<()>
where
  R: GuestRegistry + 'static,
{
  let state = ApiState {
    gate: CheckInGate::new(Arc::clone(&registry)),
    registry,
  };

  Router::new()
    // Guests
    .route("/guests", get(guests::list::<R>).post(guests::create::<R>))
    .route("/guests/{identifier}", get(guests::get_one::<R>))
    .route("/guests/{identifier}/qr", get(guests::qr_code::<R>))
    // Admin
    .route("/upload", post(admin::upload::<R>))
    .route("/stats", get(admin::stats::<R>))
    .route("/reset", post(admin::reset::<R>))
    // Door
    .route("/scan", post(scan::handler::<R>))
    .with_state(state)
}
