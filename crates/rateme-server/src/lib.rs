//! HTTP server assembly for rateme.
//!
//! Loads [`ServerConfig`], builds the chosen [`EntityStore`] backend, wraps it
//! in an [`Engine`] and serves the JSON API under `/api`.

pub mod seed;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use rateme_core::{Engine, store::EntityStore};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`EntityStore`] implementation backs the engine.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Memory,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `RATEME_*` environment variables. Missing keys take their defaults.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  pub backend:          Backend,
  /// SQLite database file; ignored by the memory backend.
  pub store_path:       PathBuf,
  /// Record demo people, ratings, comments and votes into an empty store.
  pub seed_sample_data: bool,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      backend:          Backend::Sqlite,
      store_path:       PathBuf::from("rateme.db"),
      seed_sample_data: false,
    }
  }
}

impl ServerConfig {
  /// Read `path` (optional) layered under the `RATEME_*` environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("RATEME").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
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

// ─── Application ──────────────────────────────────────────────────────────────

/// Wrap `store` in an engine, seeding it first when configured to.
pub async fn build_engine<S>(store: S, config: &ServerConfig) -> anyhow::Result<Arc<Engine<S>>>
where
  S: EntityStore,
{
  let engine = Engine::new(Arc::new(store));
  if config.seed_sample_data {
    seed::seed_if_empty(&engine)
      .await
      .context("failed to seed sample data")?;
  }
  Ok(Arc::new(engine))
}

/// Build the top-level [`Router`]: the API nested under `/api`, with
/// request tracing.
pub fn router<S>(engine: Arc<Engine<S>>) -> Router
where
  S: EntityStore + 'static,
{
  Router::new()
    .nest("/api", rateme_api::api_router(engine))
    .layer(TraceLayer::new_for_http())
}

/// Bind `config.address()` and serve until the process is stopped.
pub async fn serve<S>(engine: Arc<Engine<S>>, config: &ServerConfig) -> anyhow::Result<()>
where
  S: EntityStore + 'static,
{
  let address = config.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  tracing::info!(backend = ?config.backend, "Listening on http://{address}");
  axum::serve(listener, router(engine)).await.context("server error")?;
  Ok(())
}
