//! throne-skill server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), layers
//! `THRONE_*` environment variables on top, opens the SQLite kingship table,
//! and serves the skill webhook over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use throne_core::{Throne, clock::SystemClock};
use throne_skill::{AppState, ServerConfig, Skill};
use throne_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "King of the room voice skill")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "throne.sqlite")?
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("THRONE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let offset = server_cfg.display_offset().with_context(|| {
    format!("utc_offset_minutes out of range: {}", server_cfg.utc_offset_minutes)
  })?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if server_cfg.application_id.is_none() {
    tracing::warn!("no application_id configured; accepting requests from any skill");
  }

  let state = AppState {
    skill:  Arc::new(Skill::new(Throne::new(store, SystemClock), offset)),
    config: Arc::new(server_cfg.clone()),
  };

  let app = throne_skill::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
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
