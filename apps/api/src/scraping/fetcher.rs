//! Page Fetcher: renders a job posting in headless Chrome and hands back the DOM.
//!
//! One disposable browser per call. `headless_chrome` is a blocking driver, so the
//! whole render runs inside `tokio::task::spawn_blocking`.

use std::ffi::OsStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Desktop Chrome user agent. Enough to get past naive bot filters on job boards.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fully rendered page: the URL the browser ended up on and its serialized DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub url: String,
    pub html: String,
}

/// Any failure while rendering a page. Launch errors, navigation timeouts, DNS
/// failures and renderer crashes are deliberately not distinguished; the detail
/// string is for logs only.
#[derive(Debug, Error)]
#[error("page fetch failed: {detail}")]
pub struct FetchError {
    pub detail: String,
}

impl FetchError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Source of rendered pages. Carried in the pipeline as `Arc<dyn PageFetcher>`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RenderedPage, FetchError>;
}

#[derive(Debug, Clone)]
pub struct BrowserSettings {
    pub navigation_timeout: Duration,
    /// Upper bound on waiting for the DOM to stop changing after navigation.
    pub settle_timeout: Duration,
    /// Chrome's sandbox does not work as root inside most containers.
    pub sandbox: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_secs(30),
            settle_timeout: Duration::from_secs(5),
            sandbox: true,
        }
    }
}

/// Production fetcher backed by a local Chrome/Chromium install.
pub struct ChromePageFetcher {
    settings: BrowserSettings,
}

impl ChromePageFetcher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PageFetcher for ChromePageFetcher {
    async fn fetch(&self, url: &str) -> Result<RenderedPage, FetchError> {
        let settings = self.settings.clone();
        let url = url.to_string();

        tokio::task::spawn_blocking(move || render_page(&settings, &url))
            .await
            .map_err(|e| FetchError::new(format!("render task did not complete: {e}")))?
    }
}

/// Launches Chrome, renders `url` and returns the DOM.
///
/// `browser` owns the Chrome child process. It is dropped when this function
/// returns, on success and on every `?`, which kills the process.
fn render_page(settings: &BrowserSettings, url: &str) -> Result<RenderedPage, FetchError> {
    let started = Instant::now();

    let options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(settings.sandbox)
        .idle_browser_timeout(settings.navigation_timeout + settings.settle_timeout)
        .args(vec![
            OsStr::new("--disable-blink-features=AutomationControlled"),
            OsStr::new("--no-first-run"),
            OsStr::new("--no-default-browser-check"),
            OsStr::new("--disable-extensions"),
            OsStr::new("--mute-audio"),
        ])
        .build()
        .map_err(|e| FetchError::new(format!("invalid launch options: {e}")))?;

    let browser =
        Browser::new(options).map_err(|e| FetchError::new(format!("browser launch: {e}")))?;

    let tab = browser
        .new_tab()
        .map_err(|e| FetchError::new(format!("new tab: {e}")))?;
    tab.set_default_timeout(settings.navigation_timeout);
    tab.set_user_agent(USER_AGENT, None, None)
        .map_err(|e| FetchError::new(format!("set user agent: {e}")))?;

    tab.navigate_to(url)
        .map_err(|e| FetchError::new(format!("navigate: {e}")))?
        .wait_until_navigated()
        .map_err(|e| FetchError::new(format!("wait for navigation: {e}")))?;

    let html = wait_for_quiet_dom(&tab, settings.settle_timeout)?;
    let final_url = tab.get_url();

    info!(
        url = %final_url,
        bytes = html.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Page rendered"
    );

    Ok(RenderedPage {
        url: final_url,
        html,
    })
}

/// Polls until `readyState` is complete and two consecutive DOM snapshots match,
/// or until `settle_timeout` elapses. Returns the last snapshot either way.
fn wait_for_quiet_dom(tab: &Tab, settle_timeout: Duration) -> Result<String, FetchError> {
    let deadline = Instant::now() + settle_timeout;
    let mut previous = read_content(tab)?;

    loop {
        if Instant::now() >= deadline {
            warn!("DOM still changing after {:?}; using last snapshot", settle_timeout);
            return Ok(previous);
        }

        std::thread::sleep(SETTLE_POLL_INTERVAL);

        let current = read_content(tab)?;
        if current == previous && document_complete(tab) {
            debug!("DOM settled");
            return Ok(current);
        }
        previous = current;
    }
}

fn read_content(tab: &Tab) -> Result<String, FetchError> {
    tab.get_content()
        .map_err(|e| FetchError::new(format!("read content: {e}")))
}

fn document_complete(tab: &Tab) -> bool {
    tab.evaluate("document.readyState", false)
        .ok()
        .and_then(|remote| remote.value)
        .map(|value| value == serde_json::Value::String("complete".to_string()))
        .unwrap_or(false)
}
