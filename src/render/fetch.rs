use std::time::{Duration, Instant};

use spider_client::shapes::request::{ReturnFormat, ReturnFormatHandling};
use spider_client::{RequestParams, Spider};
use tracing::{info, warn};

use super::HtmlPage;
use crate::config::{BASE_BACKOFF_MS, MAX_RETRIES};
use crate::error::RenderError;

/// How a reference page gets opened.
#[derive(Debug, Clone)]
pub enum Fetcher {
    /// Plain GET; enough when the page is server-rendered.
    Http { timeout: Duration },
    /// spider.cloud renders the page (JS included) and returns the raw HTML.
    Spider { api_key: String, timeout: Duration },
}

impl Fetcher {
    pub fn http(timeout: Duration) -> Self {
        Self::Http { timeout }
    }

    /// Reads `SPIDER_API_KEY` from the environment.
    pub fn spider_from_env(timeout: Duration) -> Result<Self, RenderError> {
        let api_key = std::env::var("SPIDER_API_KEY").map_err(|_| RenderError::Navigation {
            url: "https://spider.cloud".to_string(),
            reason: "SPIDER_API_KEY environment variable must be set".to_string(),
        })?;
        Ok(Self::Spider { api_key, timeout })
    }

    fn timeout(&self) -> Duration {
        match self {
            Self::Http { timeout } | Self::Spider { timeout, .. } => *timeout,
        }
    }

    /// Load `url` and parse it into an [`HtmlPage`].
    pub async fn open(&self, url: &str) -> Result<HtmlPage, RenderError> {
        let start = Instant::now();
        let timeout = self.timeout();

        let html = match self {
            Self::Http { .. } => fetch_http(url, timeout).await?,
            Self::Spider { api_key, .. } => {
                let spider = Spider::new(Some(api_key.clone())).map_err(|e| {
                    RenderError::Navigation {
                        url: url.to_string(),
                        reason: format!("failed to create Spider client: {}", e),
                    }
                })?;
                fetch_spider_with_retry(&spider, url, timeout).await?
            }
        };

        info!(
            "Fetched {} ({} bytes) in {:.1}s",
            url,
            html.len(),
            start.elapsed().as_secs_f64()
        );
        Ok(HtmlPage::parse(url, &html))
    }
}

async fn fetch_http(url: &str, timeout: Duration) -> Result<String, RenderError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            RenderError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }
        } else {
            RenderError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(RenderError::Navigation {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }
    Ok(response.text().await?)
}

async fn fetch_spider_with_retry(
    spider: &Spider,
    url: &str,
    timeout: Duration,
) -> Result<String, RenderError> {
    let mut attempt = 0;
    loop {
        match fetch_spider(spider, url, timeout).await {
            Err(RenderError::Navigation { reason, .. })
                if is_retryable(&reason) && attempt < MAX_RETRIES =>
            {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    "Rate limited on {} (attempt {}/{}), backing off {:.1}s",
                    url,
                    attempt + 1,
                    MAX_RETRIES,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn is_retryable(reason: &str) -> bool {
    reason.contains("429")
        || reason.contains("rate")
        || reason.contains("500")
        || reason.contains("502")
        || reason.contains("503")
}

async fn fetch_spider(spider: &Spider, url: &str, timeout: Duration) -> Result<String, RenderError> {
    let params = RequestParams {
        return_format: Some(ReturnFormatHandling::Single(ReturnFormat::Raw)),
        ..Default::default()
    };

    let response = tokio::time::timeout(
        timeout,
        spider.scrape_url(url, Some(params), "application/json"),
    )
    .await
    .map_err(|_| RenderError::Timeout {
        url: url.to_string(),
        secs: timeout.as_secs(),
    })?
    .map_err(|e| RenderError::Navigation {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let parsed: serde_json::Value = match response.as_str() {
        Some(s) => serde_json::from_str(s).unwrap_or(response.clone()),
        None => response,
    };

    let first = parsed.as_array().and_then(|arr| arr.first());

    if let Some(error) = first.and_then(|obj| obj.get("error")).and_then(|e| e.as_str()) {
        return Err(RenderError::Navigation {
            url: url.to_string(),
            reason: error.to_string(),
        });
    }

    first
        .and_then(|obj| obj.get("content"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| RenderError::Navigation {
            url: url.to_string(),
            reason: "no content in spider response".to_string(),
        })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retries_on_rate_limit_and_server_errors_only() {
        assert!(is_retryable("HTTP status 429 Too Many Requests"));
        assert!(is_retryable("upstream returned 503"));
        assert!(!is_retryable("HTTP status 404 Not Found"));
        assert!(!is_retryable("dns error"));
    }

    #[test]
    fn timeout_is_shared_by_both_fetchers() {
        let t = Duration::from_secs(7);
        assert_eq!(Fetcher::http(t).timeout(), t);
        let spider = Fetcher::Spider { api_key: "k".into(), timeout: t };
        assert_eq!(spider.timeout(), t);
    }
}
