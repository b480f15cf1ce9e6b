//! Server assembly for Rollcall: configuration, the top-level router, and the
//! offline roster import used by `rollcall --import`.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::Router;
use rollcall_api::roster;
use rollcall_core::{guest::BulkLoadSummary, registry::GuestRegistry};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `rollcall.toml` and
/// `ROLLCALL_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "0.0.0.0".to_string() }

fn default_port() -> u16 { 8000 }

fn default_store_path() -> PathBuf { PathBuf::from("rollcall.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API under `/api`, with request
/// tracing.
pub fn router<R>(registry: Arc<R>) -> Router
where
  R: GuestRegistry + 'static,
{
  Router::new()
    .nest("/api", rollcall_api::api_router(registry))
    .layer(TraceLayer::new_for_http())
}

// ─── Import ───────────────────────────────────────────────────────────────────

/// Replace the whole roster with the guests in a CSV or Excel file's contents.
/// The format is taken from `filename`'s extension.
///
/// The file is parsed before the registry is cleared, so a malformed file
/// leaves the existing roster untouched.
pub async fn import_roster<R: GuestRegistry>(
  registry: &R,
  filename: &str,
  contents: &[u8],
) -> anyhow::Result<BulkLoadSummary> {
  let format = roster::detect_format(Some(filename), None)
    .with_context(|| format!("cannot import {filename}"))?;
  let rows = roster::parse(format, contents).context("failed to parse roster")?;
  registry
    .clear_all()
    .await
    .context("failed to clear guest registry")?;
  let summary = registry
    .bulk_load(rows)
    .await
    .context("failed to load guests")?;
  Ok(summary)
}

// ─── Integration tests ────────────────────────────────────────────────────────
