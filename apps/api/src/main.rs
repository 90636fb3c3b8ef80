mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod scraping;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{AnalysisService, JOB_ANALYSIS};
use crate::routes::build_router;
use crate::scraping::{ChromePageFetcher, JobExtractionPipeline, SiteAdapter};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview Prep API v{}", env!("CARGO_PKG_VERSION"));

    // Completion client. A missing key is not fatal; requests fail with a configuration error.
    let analysis = AnalysisService::new(config.completion())?;
    if analysis.is_configured() {
        info!(
            "Completion client initialized (base: {}, analysis model: {})",
            config.openai_base_url, JOB_ANALYSIS.model
        );
    } else {
        warn!("OPENAI_API_KEY is not set; analysis endpoints will return configuration errors");
    }

    // Headless browser is launched per request, nothing to warm up here.
    let browser = config.browser();
    info!(
        "Page fetcher: headless Chrome (navigation timeout {:?}, settle {:?}, sandbox {})",
        browser.navigation_timeout, browser.settle_timeout, browser.sandbox
    );
    let fetcher = Arc::new(ChromePageFetcher::new(browser));
    let pipeline = Arc::new(JobExtractionPipeline::new(fetcher, SiteAdapter::default()));

    let state = AppState { pipeline, analysis };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
