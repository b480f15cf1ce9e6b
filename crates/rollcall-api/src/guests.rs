//! Handlers for `/guests` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/guests` | All guests, sorted by name |
//! | `POST` | `/guests` | Body: `{"name":"…","contact":"…","seat":"…"}` |
//! | `GET`  | `/guests/:identifier` | 404 if not found |
//! | `GET`  | `/guests/:identifier/qr` | PNG of the guest's code; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use rollcall_core::{
  guest::{Guest, GuestRow, Identifier, NewGuest},
  registry::GuestRegistry,
};

use crate::{ApiState, error::ApiError, qr};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /guests`
pub async fn list<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
) -> Result<Json<Vec<Guest>>, ApiError> {
  let guests = state.registry.list_all().await.map_err(ApiError::store)?;
  Ok(Json(guests))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /guests`: returns 201 + the stored guest, including its identifier.
pub async fn create<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
  Json(body): Json<GuestRow>,
) -> Result<impl IntoResponse, ApiError> {
  let guest = NewGuest::try_from(body)?;
  let guest = state.registry.add_guest(guest).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(guest)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /guests/:identifier`
pub async fn get_one<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
  Path(identifier): Path<Identifier>,
) -> Result<Json<Guest>, ApiError> {
  let guest = find(&state, &identifier).await?;
  Ok(Json(guest))
}

// ─── QR code ──────────────────────────────────────────────────────────────────

/// `GET /guests/:identifier/qr`: only registered guests' codes are rendered.
pub async fn qr_code<R: GuestRegistry>(
  State(state): State<ApiState<R>>,
  Path(identifier): Path<Identifier>,
) -> Result<impl IntoResponse, ApiError> {
  let guest = find(&state, &identifier).await?;
  let png = qr::render_png(&guest.identifier)?;
  Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn find<R: GuestRegistry>(
  state: &ApiState<R>,
  identifier: &Identifier,
) -> Result<Guest, ApiError> {
  state
    .registry
    .find_by_identifier(identifier)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("guest {identifier} not found")))
}
