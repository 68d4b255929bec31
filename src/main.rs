//! Chat Widget Host Server
//!
//! Run with: cargo run --bin chatwidget
//!
//! # Configuration
//!
//! Reads `--config PATH`, else the default locations
//! (`~/.config/chatwidget/config.toml`, `/etc/chatwidget/config.toml`,
//! `./config.toml`). Environment variables:
//! - `CHATWIDGET_HOST`, `CHATWIDGET_PORT`: Bind address (default: 0.0.0.0:8090)
//! - `CHATWIDGET_ASSETS_DIR`: Widget bundle directory
//! - `CHATWIDGET_LOG_LEVEL`, `CHATWIDGET_LOG_FORMAT`: Logging
//! - `RUST_LOG`: Full filter, takes precedence over the configured level

use anyhow::Context;
use chatwidget::api::{serve, AppState};
use chatwidget::config::{Config, LogFormat, LoggingConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chatwidget")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Serve the chat widget bundle, its config and a demo host page")]
struct Args {
    /// Config file (default: search the standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => Config::load_default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config.logging);

    tracing::info!("Starting chat widget host v{}", env!("CARGO_PKG_VERSION"));

    let issues = config.ensure_valid().context("widget config rejected")?;
    for issue in &issues {
        tracing::warn!("{}", issue);
    }

    if !config.assets.dir.is_dir() {
        tracing::warn!(
            "Widget bundle directory {:?} does not exist, /widget will 404 (run wasm-pack build first)",
            config.assets.dir
        );
    }
    tracing::info!("Serving widget bundle from {:?}", config.assets.dir);

    serve(AppState::new(config)).await?;

    tracing::info!("Chat widget host stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("chatwidget={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
