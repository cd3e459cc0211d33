//! vitrine demo server
//!
//! Serves an in-memory widget catalog through vitrine presenters:
//!   GET /api/v1/widgets          listing (parts elided)
//!   GET /api/v1/widgets/{index}  single widget
//! Add `?internal=true` to include internal-only fields.
//!
//! Usage:
//!   vitrine-demo --port 4080 --config vitrine.toml

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;
use vitrine_presenter::RegistryConfig;
use vitrine_web::demo::{Catalog, build_router, sample_widgets};

#[derive(Parser, Debug)]
#[command(name = "vitrine-demo")]
#[command(about = "Serve a demo widget catalog through vitrine presenters")]
struct Args {
    /// HTTP port to listen on
    #[arg(short, long, default_value = "4080")]
    port: u16,

    /// Path to a presenter config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => RegistryConfig::load_from(path),
        None => RegistryConfig::default(),
    };
    info!(max_depth = config.max_depth, "vitrine demo starting...");

    let catalog = Catalog::new(config, sample_widgets()).context("Failed to declare presenters")?;
    let app = build_router(Arc::new(catalog));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", args.port))
        .await
        .with_context(|| format!("Failed to bind HTTP port {}", args.port))?;
    info!("Catalog listening on port {}", args.port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}
