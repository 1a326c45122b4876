use std::time::Duration;

use regex::Regex;

pub const DEFAULT_URL: &str = "https://www.figma.com/developers/api";

pub const SECTION_SELECTOR: &str = r#"div[id$="-endpoints"]"#;
pub const ENDPOINT_SELECTOR: &str = r#"div[id$="-endpoint"]"#;
pub const LABEL_SELECTOR: &str = "p > span";
pub const RESPONSE_SELECTOR: &str = r#"[class*="returns"]"#;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const MAX_RETRIES: u32 = 3;
pub const BASE_BACKOFF_MS: u64 = 2000;

/// CSS selectors locating each piece of the reference page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    /// Section containers, queried from the document root.
    pub section: String,
    /// Endpoint containers, queried within one section.
    pub endpoint: String,
    /// Method / URL labels, queried within one endpoint.
    pub label: String,
    /// The response block, queried within one endpoint.
    pub response: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            section: SECTION_SELECTOR.to_string(),
            endpoint: ENDPOINT_SELECTOR.to_string(),
            label: LABEL_SELECTOR.to_string(),
            response: RESPONSE_SELECTOR.to_string(),
        }
    }
}

/// What the catalog builder needs to know.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    pub selectors: Selectors,
    /// Only sections whose id matches are processed.
    pub section_filter: Option<Regex>,
    /// Parse endpoints on the rayon pool. Off means document order end to end.
    pub parallel: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            section_filter: None,
            parallel: true,
        }
    }
}

impl CatalogOptions {
    pub fn wants_section(&self, id: &str) -> bool {
        self.section_filter.as_ref().map_or(true, |re| re.is_match(id))
    }
}

/// Everything a run needs, resolved from defaults and command-line flags.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub url: String,
    pub timeout: Duration,
    pub catalog: CatalogOptions,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            catalog: CatalogOptions::default(),
        }
    }
}

// ── Tests ──
