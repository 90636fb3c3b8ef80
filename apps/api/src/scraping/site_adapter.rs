//! Site Adapter: ordered strategy table mapping job-board hosts to DOM selectors.
//!
//! Strategies are evaluated top to bottom against the page hostname. The table
//! always ends in the generic strategy, so every page gets a record. Adding a
//! supported board means adding one `SiteStrategy` entry to `STRATEGIES`.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::models::JobRecord;
use crate::scraping::fetcher::RenderedPage;

/// Elements whose text is never part of what a reader sees.
const INVISIBLE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that start on their own line when rendered.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol",
    "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPattern {
    /// Lowercased hostname contains the given fragment.
    Contains(&'static str),
    /// Matches every page, including ones with no parsable URL.
    Any,
}

impl HostPattern {
    pub fn matches(&self, host: Option<&str>) -> bool {
        match self {
            HostPattern::Contains(fragment) => host.is_some_and(|h| h.contains(fragment)),
            HostPattern::Any => true,
        }
    }
}

/// Candidate selectors per field, tried in order. First non-blank match wins.
#[derive(Debug, Clone, Copy)]
pub struct FieldSelectors {
    pub title: &'static [&'static str],
    pub company: &'static [&'static str],
    pub description: &'static [&'static str],
    pub location: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SiteStrategy {
    pub name: &'static str,
    pub host: HostPattern,
    pub fields: FieldSelectors,
}

pub const STRATEGIES: &[SiteStrategy] = &[
    SiteStrategy {
        name: "linkedin",
        host: HostPattern::Contains("linkedin"),
        fields: FieldSelectors {
            title: &[
                ".job-details-jobs-unified-top-card__job-title",
                "h1.top-card-layout__title",
                ".jobs-unified-top-card__job-title",
            ],
            company: &[
                ".job-details-jobs-unified-top-card__company-name",
                ".top-card-layout__card .topcard__org-name-link",
                ".jobs-unified-top-card__company-name",
            ],
            description: &[
                ".job-details-jobs-unified-top-card__description-container",
                ".jobs-description__container",
                ".show-more-less-html__markup",
            ],
            location: &[
                ".job-details-jobs-unified-top-card__bullet",
                ".top-card-layout__card .topcard__flavor--bullet",
                ".jobs-unified-top-card__bullet",
            ],
        },
    },
    SiteStrategy {
        name: "indeed",
        host: HostPattern::Contains("indeed"),
        fields: FieldSelectors {
            title: &[".jobsearch-JobInfoHeader-title"],
            company: &[".jobsearch-InlineCompanyRating-companyHeader"],
            description: &["#jobDescriptionText"],
            location: &[".jobsearch-JobInfoHeader-subtitle"],
        },
    },
    SiteStrategy {
        name: "generic",
        host: HostPattern::Any,
        fields: FieldSelectors {
            title: &["h1"],
            company: &["[data-test=\"company-name\"]"],
            description: &["body"],
            location: &["[data-test=\"location\"]"],
        },
    },
];

/// Applies the strategy table to rendered pages. Holds no state; cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct SiteAdapter {
    strategies: &'static [SiteStrategy],
}

impl Default for SiteAdapter {
    fn default() -> Self {
        Self {
            strategies: STRATEGIES,
        }
    }
}

impl SiteAdapter {
    /// Builds an adapter over a custom table. The table should end in a
    /// `HostPattern::Any` entry; if nothing matches, the built-in generic
    /// strategy is used.
    pub fn with_strategies(strategies: &'static [SiteStrategy]) -> Self {
        Self { strategies }
    }

    /// Picks the first strategy whose host pattern matches `url`.
    pub fn strategy_for(&self, url: &str) -> &'static SiteStrategy {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase));

        self.strategies
            .iter()
            .find(|s| s.host.matches(host.as_deref()))
            .unwrap_or(&GENERIC)
    }

    /// Extracts a job record from a rendered page. Never fails: a field whose
    /// element is missing comes back as an empty string.
    pub fn extract(&self, page: &RenderedPage) -> JobRecord {
        let strategy = self.strategy_for(&page.url);
        debug!(strategy = strategy.name, url = %page.url, "Extracting job fields");

        let document = Html::parse_document(&page.html);
        let fields = &strategy.fields;

        JobRecord {
            title: first_text(&document, fields.title),
            company: first_text(&document, fields.company),
            description: first_text(&document, fields.description),
            location: first_text(&document, fields.location),
            source_url: page.url.clone(),
        }
    }
}

static GENERIC: SiteStrategy = STRATEGIES[STRATEGIES.len() - 1];

fn first_text(document: &Html, selectors: &[&str]) -> String {
    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Skipping unparsable selector {raw:?}: {e}");
                continue;
            }
        };

        if let Some(element) = document.select(&selector).next() {
            let text = visible_text(element);
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }
    String::new()
}

/// Text of `element` as a reader sees it. Inline markup joins directly; block
/// boundaries become line breaks. Anything inside invisible tags is skipped.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_visible_text(element, &mut out);
    out
}

fn push_visible_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let name = child.value().name();
        if INVISIBLE_TAGS.contains(&name) {
            continue;
        }

        let block = BLOCK_TAGS.contains(&name);
        if block {
            break_line(out);
        }
        push_visible_text(child, out);
        if block {
            break_line(out);
        }
    }
}

fn break_line(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}
