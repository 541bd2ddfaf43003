//! Periodic sweeper for the token stores
//!
//! Runs the cleanup loop against the configured backend until interrupted.
//! Only the durable backend accumulates expired rows; the other backends
//! are accepted but the sweeps reclaim nothing.

use std::sync::Arc;

use anyhow::Context;
use tl_core::services::{TokenCleanupConfig, TokenCleanupService};
use tl_infra::stores::build_stores;
use tl_shared::config::{AppConfig, LogFormat, LoggingConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(logging: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        backend = %config.store.backend,
        interval_seconds = config.sweep.interval_seconds,
        "Starting token sweeper"
    );

    if config.jwt.is_using_default_secret() {
        warn!("JWT_SECRET is not set, the development signing secret is in use");
    }

    let stores = build_stores(&config)
        .await
        .context("failed to connect the token stores")?;

    if !stores.requires_sweep() {
        warn!(backend = %stores.backend, "Backend expires entries natively, sweeps will reclaim nothing");
    }

    let cleanup = Arc::new(TokenCleanupService::new(
        stores.revocations,
        stores.reset_tokens,
        TokenCleanupConfig::from(&config.sweep),
    ));

    let Some(task) = cleanup.start_background_task() else {
        warn!("Sweeping is disabled (TOKEN_SWEEP_ENABLED=false), exiting");
        return Ok(());
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    info!("Shutting down token sweeper");
    task.abort();
    Ok(())
}
