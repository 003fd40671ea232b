// src/page/fetch.rs
// =============================================================================
// This module downloads pages for the crawler.
//
// Key functionality:
// - Makes one HTTP GET per URL, bounded by a per-request timeout
// - Accepts only HTML responses (other content types are ignored)
// - Sorts failures into a small set of typed errors
//
// No retries happen here: a failed fetch is a dead end for that URL.
//
// Rust concepts:
// - async-trait: lets us keep the fetcher behind `Arc<dyn Fetcher>`
// - thiserror: derives Display/Error for our error enum
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Why a page could not be fetched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not finish within the timeout
    #[error("request timed out")]
    Timeout,
    /// Connection, TLS, DNS, redirect or body errors
    #[error("transport error: {0}")]
    Transport(String),
    /// The response was not an HTML page
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),
    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),
}

/// Retrieves the body of one URL under a timeout.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError>;
}

/// Fetches pages over HTTP(S) with reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds the shared client
    //
    // One client is reused for every request (connection pooling); cloning it
    // for each worker is cheap because it is reference counted internally.
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("link-harvest/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, FetchError> {
        // The request timeout covers connecting, headers and the body download
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // A missing header is given the benefit of the doubt
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        if !is_html(&content_type) {
            return Err(FetchError::UnsupportedContentType(content_type));
        }

        response.text().await.map_err(categorize_error)
    }
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}

// Categorizes the different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::Transport("too many redirects".to_string())
    } else if error.is_connect() {
        FetchError::Transport(format!("connection failed: {}", error))
    } else {
        FetchError::Transport(error.to_string())
    }
}
