//! Livewatch - Binary Entry Point

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livewatch::api::http::{serve, shutdown_on};
use livewatch::{AppState, Args, Config, Registry, Scanner, WatchLoop};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("livewatch={0},tower_http={0}", args.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting {} {}", livewatch::NAME, livewatch::VERSION);

    let config = Config::from_args(&args)?;
    info!(
        root = %config.root.display(),
        interval_ms = config.interval.as_millis() as u64,
        "watching"
    );

    let registry = Arc::new(Registry::new());
    let scanner = Scanner::new(&config.root, config.filter.clone());
    WatchLoop::new(scanner, registry.clone(), config.interval).spawn()?;

    let state = Arc::new(AppState::new(&config.root, &config.reload_path, registry));
    serve(&config.addr, state, shutdown_on(tokio::signal::ctrl_c())).await?;

    info!("Shut down");
    Ok(())
}
