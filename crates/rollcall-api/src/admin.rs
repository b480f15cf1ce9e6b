//! Handlers for the organiser's endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/upload` | Body: CSV or Excel file; optional `?filename=`; replaces the roster |
//! | `GET`  | `/stats` | Check-in progress |
//! | `POST` | `/reset` | Clears every check-in |

use axum::{
  Json,
  body::Bytes,
  extract::{Query, State},
  http::{HeaderMap, header},
};
use rollcall_core::{guest::Stats, registry::GuestRegistry};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError, roster};

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadParams {
  /// Original name of the uploaded file, used to detect its format.
  pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
  pub success:  bool,
  pub message:  String,
  pub inserted: usize,
  pub skipped:  usize,
}

/// `POST /upload[?filename=guests.xlsx]`; the body is the raw file.
///
/// The roster is validated before anything is deleted, so a rejected upload
/// leaves the current guest list in place.
pub async fn upload<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
  Query(params): Query<UploadParams>,
  headers: HeaderMap,
  body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
  let content_type = headers
    .get(header::CONTENT_TYPE)
    .and_then(|v| v.to_str().ok());
  let format = roster::detect_format(params.filename.as_deref(), content_type)?;
  let rows = roster::parse(format, &body)?;

  state.registry.clear_all().await.map_err(ApiError::store)?;
  let summary = state.registry.bulk_load(rows).await.map_err(ApiError::store)?;

  tracing::info!(
    inserted = summary.inserted,
    skipped = summary.skipped,
    "guest list replaced"
  );
  Ok(Json(UploadResponse {
    success:  true,
    message:  format!("{} guests loaded", summary.inserted),
    inserted: summary.inserted,
    skipped:  summary.skipped,
  }))
}

// ─── Stats ────────────────────────────────────────────────────────────────────

/// `GET /stats`
pub async fn stats<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
) -> Result<Json<Stats>, ApiError> {
  let stats = state.registry.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}

// ─── Reset ────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetResponse {
  pub success: bool,
  pub message: String,
  /// How many guests were checked in before the reset.
  pub reset:   u64,
}

/// `POST /reset`
pub async fn reset<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
) -> Result<Json<ResetResponse>, ApiError> {
  let reset = state
    .registry
    .reset_all_check_ins()
    .await
    .map_err(ApiError::store)?;

  tracing::info!(reset, "check-ins reset");
  Ok(Json(ResetResponse {
    success: true,
    message: format!("{reset} check-ins reset"),
    reset,
  }))
}
