//! HTTP fetching with timeout, browser headers, and bounded retry.
//!
//! One [`Fetcher`] wraps a single [`reqwest::Client`] that is reused across
//! sequential requests (connection pool, default headers). A failed request
//! is retried up to `max_retries` attempts with exponential backoff and a
//! little jitter; the last error is returned once attempts are exhausted.
//!
//! # Backoff
//!
//! ```text
//! delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
//! ```

use rand::{rng, Rng};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A fetched page: final HTTP status plus the response body.
#[derive(Debug)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

/// HTTP client with per-request timeout and bounded retry.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Fetcher {
    /// Build a fetcher with the given request timeout and attempt budget.
    ///
    /// The client sends browser-like headers so the origin serves the same
    /// markup it serves to a real browser.
    pub fn new(timeout_secs: u64, max_retries: u32) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.8,en-US;q=0.5,en;q=0.3"),
        );
        headers.insert(
            REFERER,
            HeaderValue::from_static("https://www.itworld.co.kr/"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            max_retries: max_retries.max(1),
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        })
    }

    /// GET `url`, retrying on transport errors and non-2xx responses.
    ///
    /// Returns the body and status of the first successful attempt, or the
    /// error of the final attempt. Timeout, connect failure, and HTTP status
    /// errors stay distinguishable on the returned [`reqwest::Error`].
    #[instrument(level = "info", skip(self), fields(%url))]
    pub async fn get(&self, url: &str) -> Result<Page, reqwest::Error> {
        let t0 = Instant::now();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            match self.try_get(url).await {
                Ok(page) => {
                    debug!(
                        attempt,
                        status = page.status,
                        bytes = page.body.len(),
                        elapsed_ms = t0.elapsed().as_millis() as u64,
                        "Fetched page"
                    );
                    return Ok(page);
                }
                Err(e) => {
                    if attempt >= self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            error = %e,
                            kind = error_kind(&e),
                            "Fetch exhausted retries"
                        );
                        return Err(e);
                    }

                    let delay = backoff_delay(attempt, self.base_delay, self.max_delay);
                    let jitter = Duration::from_millis(rng().random_range(0..=250));
                    warn!(
                        attempt,
                        max = self.max_retries,
                        error = %e,
                        kind = error_kind(&e),
                        ?delay,
                        "Fetch attempt failed; backing off"
                    );
                    sleep(delay + jitter).await;
                }
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<Page, reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Page { status, body })
    }
}

/// Exponential backoff before retry `attempt` (1-based), capped at `max`.
fn backoff_delay(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 1u32 << (attempt - 1).min(16);
    base.saturating_mul(factor).min(max)
}

/// Short label for the failure class, used in log fields.
fn error_kind(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_status() {
        "status"
    } else {
        "other"
    }
}
