use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use pantry_core::config::Config;
use pantry_core::SnapshotCache;
use pantry_source::DelimitedFile;
use pantry_web::AppState;

#[derive(Parser)]
#[command(name = "pantry", about = "Cached search API over a delimited food table")]
struct Cli {
    /// Address to bind (overrides `server.host`).
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides `server.port`).
    #[arg(long)]
    port: Option<u16>,
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    debug: bool,
    /// Config file; defaults to ./pantry.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Table to serve (overrides `data.path`).
    #[arg(long)]
    data: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(data) = cli.data {
        config.data.path = data;
    }

    let source = DelimitedFile::from_config(&config.data);
    let cache = Arc::new(
        SnapshotCache::new(source, config.cache.staleness())
            .with_na_values(config.data.na_values.clone()),
    );

    // Warm the cache without holding up the listener.
    let _ = cache.spawn_warm_up();

    let state = AppState::new(cache).with_query_config(&config.query);

    pantry_web::serve(&config.server.host, config.server.port, state).await
}
