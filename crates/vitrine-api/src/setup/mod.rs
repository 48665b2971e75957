//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vitrine_core::Config;
use vitrine_storage::LocalStorage;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_tracing(config.is_production())
        .context("Failed to initialize tracing")?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let state = build_state(config.clone()).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Build the shared state: local storage under the public root plus the pipeline
pub async fn build_state(config: Config) -> Result<Arc<AppState>> {
    let public_root = config.upload().public_root.clone();
    let storage = LocalStorage::new(&public_root)
        .await
        .with_context(|| format!("Failed to prepare public root {}", public_root.display()))?;

    tracing::info!(public_root = %public_root.display(), "Local storage initialized");

    Ok(Arc::new(AppState::new(config, Arc::new(storage))))
}
