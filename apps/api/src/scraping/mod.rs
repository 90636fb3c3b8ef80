// Job posting extraction: headless render, per-site field selection, normalization.
// Nothing in here talks to the completion API.

pub mod fetcher;
pub mod pipeline;
pub mod site_adapter;

pub use fetcher::{BrowserSettings, ChromePageFetcher};
pub use pipeline::{ExtractionError, JobExtractionPipeline};
pub use site_adapter::SiteAdapter;

#[cfg(test)]
pub mod testing;
