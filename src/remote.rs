//! Outbound dictionary fetching.
//!
//! All network I/O goes through the [`Fetcher`] trait so the engine can be
//! exercised in tests with canned pages and call counting. The production
//! implementation is a thin reqwest wrapper with browser-like headers and
//! capped, cancellable timeouts.
//!
//! The one load-bearing distinction here: a 404 is a *definitive* not-found
//! (safe to cache forever), while timeouts, connection errors, and any other
//! failure status are *transient* (must never be cached, so the next request
//! retries the network).

use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// Fixed page-fetch timeout. Transcription callers are interactive; past this
/// point we surface a transient miss rather than keep them waiting.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Audio files are larger than pages and fetched off the critical path.
pub const AUDIO_TIMEOUT: Duration = Duration::from_secs(15);

/// URL for a normalized, slugged word.
pub fn lookup_url(slug: &str) -> String {
    format!("https://dictionary.cambridge.org/dictionary/english/{slug}")
}

/// Outcome of fetching a dictionary page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// 2xx with a body.
    Found(String),

    /// Definitive 404: the word does not exist at the source.
    NotFound,

    /// Timeout, network error, or a non-404 failure status. Not cacheable.
    Transient(String),
}

/// Network seam for the engine.
///
/// Implementations must be cheap to share (`&self` methods, `Send + Sync`);
/// the engine holds one fetcher for its lifetime.
pub trait Fetcher: Send + Sync {
    /// Fetch a dictionary page, classifying the failure mode.
    fn fetch_page(&self, url: &str) -> impl Future<Output = PageOutcome> + Send;

    /// Fetch an audio asset's bytes.
    fn fetch_bytes(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Production fetcher over a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        // The source serves a bot-check page to unadorned clients, so we
        // present ordinary browser headers.
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
            )
            .build()?;

        Ok(Self { client })
    }

    /// The underlying client, shared with the dictionary first-run download.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> PageOutcome {
        let response = self
            .client
            .get(url)
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .timeout(PAGE_TIMEOUT)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => return PageOutcome::Transient(err.to_string()),
        };

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return PageOutcome::NotFound;
        }
        if !status.is_success() {
            return PageOutcome::Transient(format!("unexpected status {status}"));
        }

        match response.text().await {
            Ok(body) => PageOutcome::Found(body),
            Err(err) => PageOutcome::Transient(err.to_string()),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url)
            .timeout(AUDIO_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_url_embeds_slug() {
        assert_eq!(
            lookup_url("give-up"),
            "https://dictionary.cambridge.org/dictionary/english/give-up"
        );
    }
}
