//! Handler for `POST /scan`, the door scanner's only endpoint.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use rollcall_core::{gate::ScanResponse, registry::GuestRegistry};
use serde::Deserialize;

use crate::ApiState;

#[derive(Debug, Deserialize)]
pub struct ScanBody {
  /// The decoded payload of the scanned code. Missing means empty.
  #[serde(default)]
  pub code: String,
}

/// `POST /scan` with body `{"code":"…"}`.
///
/// Always answers 200; the outcome is carried in the response's `status`.
/// A body that is not a JSON object with a string `code` is answered with the
/// `error` status rather than an HTTP rejection.
pub async fn handler<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
  body: Result<Json<ScanBody>, JsonRejection>,
) -> Json<ScanResponse> {
  match body {
    Ok(Json(body)) => Json(state.gate.validate(&body.code).await),
    Err(rejection) => {
      tracing::warn!(error = %rejection.body_text(), "unreadable scan request");
      Json(ScanResponse::unavailable())
    }
  }
}
