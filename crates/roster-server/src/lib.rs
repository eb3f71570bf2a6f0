//! HTTP host for the roster API.
//!
//! Loads [`ServerConfig`] and wraps [`roster_api::api_router`] in request
//! tracing. The binary in `main.rs` wires these to a SQLite store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use roster_core::store::{ClientRepository, PersonRepository};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub database_path:      PathBuf,
  /// Send raw storage diagnostics to clients instead of only logging them.
  pub expose_diagnostics: bool,
}

impl ServerConfig {
  /// Layer built-in defaults, the optional TOML file at `path`, and
  /// `ROSTER_*` environment variables, in that order.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080_i64)?
      .set_default("database_path", "roster.db")?
      .set_default("expose_diagnostics", false)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("ROSTER"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application ──────────────────────────────────────────────────────────────

/// The full application router with HTTP tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: PersonRepository + ClientRepository + 'static,
{
  roster_api::api_router(store, config.expose_diagnostics)
    .layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
