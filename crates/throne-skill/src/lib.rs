//! Voice-assistant skill layer for the king-of-the-room throne.
//!
//! Exposes an axum [`Router`] that accepts the platform's request envelope on
//! `POST /` and answers with a response envelope, backed by any
//! [`KingshipStore`].

pub mod dispatch;
pub mod envelope;
pub mod error;
pub mod speech;

pub use dispatch::Skill;
pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  extract::State,
  routing::{get, post},
};
use chrono::FixedOffset;
use serde::Deserialize;
use throne_core::{clock::Clock, store::KingshipStore};
use tower_http::trace::TraceLayer;

use envelope::{RequestEnvelope, ResponseEnvelope};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `THRONE_*` environment variables.
#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  /// When set, requests from any other skill application are refused.
  #[serde(default)]
  pub application_id:     Option<String>,
  /// Fixed offset from UTC, in minutes, used when speaking dates.
  #[serde(default)]
  pub utc_offset_minutes: i32,
}

impl ServerConfig {
  /// The configured display offset, or `None` if it is out of range.
  pub fn display_offset(&self) -> Option<FixedOffset> {
    FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, C> {
  pub skill:  Arc<Skill<S, C>>,
  pub config: Arc<ServerConfig>,
}

impl<S, C> Clone for AppState<S, C> {
  fn clone(&self) -> Self {
    Self { skill: Arc::clone(&self.skill), config: Arc::clone(&self.config) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the skill endpoint.
pub fn router<S, C>(state: AppState<S, C>) -> Router
where
  S: KingshipStore + 'static,
  C: Clock + 'static,
{
  Router::new()
    .route("/", post(skill_handler::<S, C>))
    .route("/health", get(health_handler))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn skill_handler<S, C>(
  State(state): State<AppState<S, C>>,
  Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, Error>
where
  S: KingshipStore + 'static,
  C: Clock + 'static,
{
  verify_application(&state.config, &envelope)?;

  if envelope.session.user.user_id.is_empty() {
    return Err(Error::BadRequest("session.user.userId is empty".to_string()));
  }

  Ok(Json(state.skill.handle(&envelope).await))
}

async fn health_handler() -> &'static str { "ok" }

/// Refuse envelopes addressed to a different skill application.
fn verify_application(
  config: &ServerConfig,
  envelope: &RequestEnvelope,
) -> Result<(), Error> {
  let Some(expected) = config.application_id.as_deref() else {
    return Ok(());
  };

  let actual = envelope
    .session
    .application
    .as_ref()
    .map(|a| a.application_id.as_str());

  if actual == Some(expected) {
    Ok(())
  } else {
    tracing::warn!(?actual, "rejecting request for another application");
    Err(Error::Forbidden)
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
