//! Fertilizer Advisor - decision-tree fertilizer recommendations over HTTP
//!
//! Loads the classifier and label encoders once at startup and serves the
//! recommendation pages and prediction API. If the assets fail to load the
//! server still starts, answering asset-dependent routes with errors.

use advisor_lib::{
    health::HealthRegistry,
    observability::{AdvisorMetrics, StructuredLogger},
    AssetStore, FertilizerAdvisor,
};
use anyhow::Result;
use fertilizer_advisor::{api, pages::Pages, AdvisorConfig};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ADVISOR_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = AdvisorConfig::load()?;
    let addr = config.bind_addr();

    let logger = StructuredLogger::new("fertilizer-advisor");
    logger.log_startup(ADVISOR_VERSION, &addr);

    let health_registry = HealthRegistry::new();
    let metrics = AdvisorMetrics::new();

    // Assets load before the listener binds; failure means degraded mode
    let paths = config.asset_paths();
    let advisor = match AssetStore::new(paths.clone()).load() {
        Ok(assets) => {
            logger.log_assets_loaded(&assets);
            health_registry
                .record_asset_load(Ok(()), &paths.model_path)
                .await;
            FertilizerAdvisor::new(assets)
        }
        Err(err) => {
            logger.log_asset_load_failed(&err, &paths);
            health_registry
                .record_asset_load(Err(&err), &paths.model_path)
                .await;
            FertilizerAdvisor::unavailable()
        }
    };
    metrics.set_assets(advisor.assets());

    let pages = Pages::new()?;
    let app_state = Arc::new(api::AppState::new(
        advisor,
        pages,
        health_registry.clone(),
        metrics,
        logger.clone(),
    ));

    health_registry.set_ready(true).await;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
        }
    };
    api::serve(&addr, app_state, shutdown).await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}
