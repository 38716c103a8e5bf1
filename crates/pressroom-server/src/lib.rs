//! Server assembly for Pressroom: configuration and the top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{
  Router,
  body::Body,
  http::{Response, StatusCode},
};
use pressroom_core::repository::{PostRepository, UserRepository};
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, TraceLayer};
use tracing::{Level, Span};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PRESSROOM_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path:         PathBuf,
  /// Upper bound on a single storage operation, in milliseconds.
  pub storage_timeout_ms: u64,
  /// Log at `debug` instead of `info` unless `RUST_LOG` says otherwise.
  pub debug:              bool,
  pub log_format:         LogFormat,
}

/// How log lines are rendered.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  /// Human-readable console output, for development.
  Text,
  /// One JSON object per line, for log collectors.
  #[default]
  Json,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               "0.0.0.0".to_string(),
      port:               8080,
      store_path:         PathBuf::from("pressroom.db"),
      storage_timeout_ms: 5_000,
      debug:              false,
      log_format:         LogFormat::default(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `PRESSROOM_*` environment
  /// variables; anything unset keeps its default.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("PRESSROOM"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn storage_timeout(&self) -> Duration {
    Duration::from_millis(self.storage_timeout_ms)
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn log_level(&self) -> Level {
    if self.debug { Level::DEBUG } else { Level::INFO }
  }
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

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the application router: the JSON API plus per-request logging.
pub fn router<U, P>(users: Arc<U>, posts: Arc<P>) -> Router
where
  U: UserRepository + 'static,
  P: PostRepository + 'static,
{
  pressroom_api::api_router(users, posts).layer(
    TraceLayer::new_for_http()
      .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
      .on_response(log_response)
      .on_failure(DefaultOnFailure::new().level(Level::WARN)),
  )
}

/// Successful responses log at `info`; everything else at `warn`.
fn response_level(status: StatusCode) -> Level {
  if status.is_success() { Level::INFO } else { Level::WARN }
}

fn log_response(response: &Response<Body>, latency: Duration, _span: &Span) {
  let status = response.status();
  let latency_ms = latency.as_millis() as u64;
  if response_level(status) == Level::INFO {
    tracing::info!(status = status.as_u16(), latency_ms, "finished processing request");
  } else {
    tracing::warn!(status = status.as_u16(), latency_ms, "finished processing request");
  }
}
