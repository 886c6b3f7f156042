//! Page reader collaborator
//!
//! The crawl logic depends only on the [`PageReader`] trait plus the small
//! DOM helper surface in [`dom`], not on any particular fetching technology.
//! [`HttpPageReader`] is the production implementation backed by reqwest.

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

pub mod dom;

pub use dom::{attribute, select_all, select_first, selector, text};

/// Errors from fetching or querying a page
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("invalid selector: {0:?}")]
    Selector(String),

    #[error("missing element {selector:?} on {url}")]
    MissingElement { url: String, selector: String },
}

/// Capability to fetch a rendered page body for a URL.
#[allow(async_fn_in_trait)]
pub trait PageReader {
    async fn fetch_page(&self, url: &str) -> Result<String, PageError>;
}

/// Builds the HTTP client used for page fetches
///
/// Explicit timeouts and a descriptive user agent; compressed transfer
/// encodings enabled.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format!("ico-harvest/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production page reader backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpPageReader {
    client: Client,
}

impl HttpPageReader {
    pub fn new() -> Result<Self, PageError> {
        Ok(Self {
            client: build_http_client().map_err(PageError::Client)?,
        })
    }
}

impl PageReader for HttpPageReader {
    async fn fetch_page(&self, url: &str) -> Result<String, PageError> {
        tracing::debug!("Fetching page: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| PageError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| PageError::Request {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client().is_ok());
    }

    #[test]
    fn test_http_page_reader_new() {
        assert!(HttpPageReader::new().is_ok());
    }
}
