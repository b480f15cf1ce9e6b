//! rollcall server binary.
//!
//! Reads `rollcall.toml` (or the path specified with `--config`), opens the
//! SQLite guest registry, and serves the JSON API over HTTP.
//!
//! # Loading a guest list without the API
//!
//! ```
//! rollcall --import guests.csv
//! rollcall --import guests.xlsx
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use rollcall_server::{ServerConfig, import_roster};
use rollcall_store_sqlite::SqliteRegistry;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Rollcall event check-in server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "rollcall.toml")]
  config: PathBuf,

  /// Replace the guest list with the contents of this CSV or Excel file and
  /// exit.
  #[arg(long, value_name = "FILE")]
  import: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("ROLLCALL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  let registry = SqliteRegistry::open(&store_path)
    .await
    .with_context(|| format!("failed to open guest registry at {store_path:?}"))?;
  tracing::info!(path = %store_path.display(), "guest registry ready");

  // Import mode: load the roster and exit.
  if let Some(roster_path) = cli.import {
    let contents = tokio::fs::read(&roster_path)
      .await
      .with_context(|| format!("failed to read {roster_path:?}"))?;
    let filename = roster_path.to_string_lossy();
    let summary = import_roster(&registry, &filename, &contents).await?;
    tracing::info!(
      inserted = summary.inserted,
      skipped = summary.skipped,
      "imported {filename}"
    );
    return Ok(());
  }

  let app = rollcall_server::router(Arc::new(registry));
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  tracing::info!("Scanner endpoint: POST http://{address}/api/scan");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
