//! HTTP client for the Girls' Frontline wiki.

use std::path::Path;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use url::Url;

use crate::{user_agent::get_user_agent, Error};

/// Production wiki host.
pub const DEFAULT_BASE_URL: &str = "https://en.gfwiki.com";

/// Wiki page listing every T-Doll name.
pub const INDEX_PATH: &str = "wiki/T-Doll_Index";

/// Pause after every successful request, as the wiki's crawl policy asks.
pub const CRAWL_DELAY: Duration = Duration::from_secs(20);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the wiki.
///
/// Requests are sent one at a time with browser-like headers. Every request
/// the server answers, whatever the status, is followed by a fixed sleep of
/// `crawl_delay`. Transport failures return immediately. Nothing is retried.
pub struct Client {
    /// Base URL, always ending in `/` so relative paths join under it.
    base_url: Url,
    http: reqwest::Client,
    crawl_delay: Duration,
}

impl Client {
    /// Creates a client pointing at the production wiki.
    pub fn new() -> Result<Self, Error> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let http = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            base_url,
            http,
            crawl_delay: CRAWL_DELAY,
        })
    }

    /// Overrides the pause taken after each answered request.
    pub fn with_crawl_delay(mut self, delay: Duration) -> Self {
        self.crawl_delay = delay;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn crawl_delay(&self) -> Duration {
        self.crawl_delay
    }

    /// Resolves a page path or image `src` against the base URL.
    ///
    /// Absolute and protocol-relative sources pass through unchanged.
    pub fn resolve(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Fetches a wiki page and returns its HTML body.
    pub async fn get_page(&self, path: &str) -> Result<String, Error> {
        let url = self.resolve(path)?;
        tracing::debug!("GET {}", url);
        let resp = self
            .http
            .get(url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("cache-control", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get {}: {}", url, e);
                Error::Request(e)
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read body of {}: {}", url, e);
            Error::Request(e)
        })?;

        // Any answered request counts against the crawl budget.
        self.pause().await;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request to {} failed with status {}", url, status);
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }

    /// Downloads `src` to `dest`, writing the body chunk by chunk.
    ///
    /// Returns the number of bytes written.
    pub async fn download(&self, src: &str, dest: &Path) -> Result<u64, Error> {
        let url = self.resolve(src)?;
        tracing::debug!("GET {} -> {}", url, dest.display());
        let mut resp = self.http.get(url.clone()).send().await.map_err(|e| {
            tracing::error!("Failed to get {}: {}", url, e);
            Error::Request(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::error!("Request to {} failed with status {}", url, status);
            self.pause().await;
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::new(),
            });
        }

        let io_err = |source| Error::Io {
            path: dest.to_path_buf(),
            source,
        };
        let mut file = tokio::fs::File::create(dest).await.map_err(io_err)?;
        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await.map_err(io_err)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_err)?;

        self.pause().await;
        Ok(written)
    }

    async fn pause(&self) {
        if !self.crawl_delay.is_zero() {
            tokio::time::sleep(self.crawl_delay).await;
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
