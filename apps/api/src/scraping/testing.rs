//! Test doubles for the page fetcher seam.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::scraping::fetcher::{FetchError, PageFetcher, RenderedPage};

/// Serves one canned HTML document for any URL, or fails like a navigation timeout.
pub struct FixtureFetcher {
    html: Option<&'static str>,
    calls: AtomicUsize,
}

impl FixtureFetcher {
    pub fn serving(html: &'static str) -> Arc<Self> {
        Arc::new(Self {
            html: Some(html),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            html: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<RenderedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.html {
            Some(html) => Ok(RenderedPage {
                url: url.to_string(),
                html: html.to_string(),
            }),
            None => Err(FetchError::new(
                "wait for navigation: Timeout while waiting for event",
            )),
        }
    }
}

/// Indeed posting used across pipeline and router tests.
pub const INDEED_POSTING: &str = r#"
    <html><body>
      <h1 class="jobsearch-JobInfoHeader-title">  Backend   Engineer </h1>
      <div class="jobsearch-InlineCompanyRating-companyHeader">Acme</div>
      <div class="jobsearch-JobInfoHeader-subtitle">Remote, US</div>
      <div id="jobDescriptionText">
          5 years Go experience...
      </div>
    </body></html>
"#;
