//! rateme server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `RATEME_*` environment variables, opens the configured store and serves
//! the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rateme_core::MemoryStore;
use rateme_server::{Backend, ServerConfig};
use rateme_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "rateme rating server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Seed demo data into an empty store, overriding the config value.
  #[arg(long)]
  seed: bool,
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

  let mut config = ServerConfig::load(&cli.config)?;
  if cli.seed {
    config.seed_sample_data = true;
  }

  match config.backend {
    Backend::Sqlite => {
      let store = SqliteStore::open(&config.store_path)
        .await
        .with_context(|| format!("failed to open store at {:?}", config.store_path))?;
      let engine = rateme_server::build_engine(store, &config).await?;
      rateme_server::serve(engine, &config).await
    }
    Backend::Memory => {
      tracing::warn!("memory backend selected; data is lost on shutdown");
      let engine = rateme_server::build_engine(MemoryStore::new(), &config).await?;
      rateme_server::serve(engine, &config).await
    }
  }
}
