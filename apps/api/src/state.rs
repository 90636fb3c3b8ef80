use std::sync::Arc;

use crate::llm_client::AnalysisService;
use crate::scraping::JobExtractionPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Immutable after startup; each request works on its own clone.
#[derive(Clone)]
pub struct AppState {
    /// Scrape pipeline. Its `PageFetcher` is swappable (headless Chrome in production).
    pub pipeline: Arc<JobExtractionPipeline>,
    /// Completion client built from `Config::completion()`.
    pub analysis: AnalysisService,
}
