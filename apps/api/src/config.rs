use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::{CompletionConfig, DEFAULT_BASE_URL};
use crate::scraping::BrowserSettings;

/// Application configuration loaded from environment variables.
///
/// Nothing is strictly required at startup: a missing `OPENAI_API_KEY` is
/// reported per request as a configuration error. Malformed values fail fast.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub completion_timeout: Duration,
    pub browser_navigation_timeout: Duration,
    pub browser_settle_timeout: Duration,
    pub browser_no_sandbox: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            completion_timeout: secs(&lookup, "COMPLETION_TIMEOUT_SECS", 60)?,
            browser_navigation_timeout: secs(&lookup, "BROWSER_NAVIGATION_TIMEOUT_SECS", 30)?,
            browser_settle_timeout: secs(&lookup, "BROWSER_SETTLE_TIMEOUT_SECS", 5)?,
            browser_no_sandbox: flag(&lookup, "BROWSER_NO_SANDBOX")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            api_key: self.openai_api_key.clone(),
            base_url: self.openai_base_url.clone(),
            timeout: self.completion_timeout,
        }
    }

    pub fn browser(&self) -> BrowserSettings {
        BrowserSettings {
            navigation_timeout: self.browser_navigation_timeout,
            settle_timeout: self.browser_settle_timeout,
            sandbox: !self.browser_no_sandbox,
        }
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("{key} must be a whole number of seconds")),
        None => Ok(Duration::from_secs(default)),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<bool> {
    match lookup(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => anyhow::bail!("{key} must be true/false/1/0, got '{v}'"),
    }
}
