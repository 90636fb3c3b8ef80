//! Job extraction pipeline.
//!
//! Flow: validate URL → fetch rendered page → site adapter → normalize → check description.
//! Single attempt, no retries; re-trying is the caller's decision.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use url::Url;

use crate::models::JobRecord;
use crate::scraping::fetcher::PageFetcher;
use crate::scraping::site_adapter::SiteAdapter;

/// Why an extraction attempt produced no record.
///
/// The `Display` text is safe to show to end users; internal detail is logged, not carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("A valid http(s) job posting URL is required")]
    InvalidUrl,

    #[error("Failed to fetch job description")]
    FetchFailed,

    #[error("Could not find a job description on this page")]
    EmptyDescription,
}

pub type ExtractionResult = Result<JobRecord, ExtractionError>;

pub struct JobExtractionPipeline {
    fetcher: Arc<dyn PageFetcher>,
    adapter: SiteAdapter,
}

impl JobExtractionPipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, adapter: SiteAdapter) -> Self {
        Self { fetcher, adapter }
    }

    pub async fn run(&self, url: &str) -> ExtractionResult {
        let url = validate_url(url)?;

        info!(url = %url, "Scraping job description");
        let page = self.fetcher.fetch(&url).await.map_err(|e| {
            error!(url = %url, "Scraping error: {e}");
            ExtractionError::FetchFailed
        })?;

        let record = normalize_record(self.adapter.extract(&page), &url);

        if record.description.is_empty() {
            warn!(url = %url, "Page rendered but no job description was found");
            return Err(ExtractionError::EmptyDescription);
        }

        info!(
            url = %url,
            title = %record.title,
            company = %record.company,
            description_chars = record.description.chars().count(),
            "Job description scraped successfully"
        );
        Ok(record)
    }
}

fn validate_url(raw: &str) -> Result<String, ExtractionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtractionError::InvalidUrl);
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(trimmed.to_string()),
        _ => Err(ExtractionError::InvalidUrl),
    }
}

/// Normalizes every text field and pins `source_url` to the requested URL
/// (the adapter sees the post-redirect URL).
pub fn normalize_record(record: JobRecord, requested_url: &str) -> JobRecord {
    JobRecord {
        title: normalize_text(&record.title),
        company: normalize_text(&record.company),
        description: normalize_text(&record.description),
        location: normalize_text(&record.location),
        source_url: requested_url.to_string(),
    }
}

/// Collapses horizontal whitespace runs to one space, trims each line and
/// drops blank lines. Line structure is otherwise preserved.
pub fn normalize_text(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
