//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - Same-domain redirect handling
//! - GET requests to fetch page content
//! - Status and Content-Type validation

use crate::url::extract_domain;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum number of redirect hops followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// A page that was fetched and confirmed to be HTML
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after same-domain redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Reasons a fetch did not produce an HTML page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Non-success HTTP status (including a redirect that was not followed)
    #[error("HTTP Error: {0}")]
    HttpStatus(u16),

    /// Connection, timeout, TLS or body read failure
    #[error("{0}")]
    Network(String),

    /// Response was not `text/html`
    #[error("Content-Type is not HTML: {content_type}")]
    NotHtml { content_type: String },
}

/// Builds an HTTP client with proper configuration
///
/// The client follows up to [`MAX_REDIRECTS`] redirects as long as they stay
/// on the same domain (host and port). A redirect to another domain is not
/// followed; the 3xx response is returned as-is and reported as an HTTP error.
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header
/// * `timeout` - Timeout for each request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_harvest::crawler::build_http_client;
///
/// let client = build_http_client("SumiHarvest/1.0 (CLI)", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .redirect(same_domain_redirects())
        .gzip(true)
        .brotli(true)
        .build()
}

fn same_domain_redirects() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let origin = attempt.previous().first().and_then(extract_domain);
        let target = extract_domain(attempt.url());

        if origin.is_some() && origin == target {
            attempt.follow()
        } else {
            tracing::debug!("Not following cross-domain redirect to {}", attempt.url());
            attempt.stop()
        }
    })
}

/// Fetches one URL with a single GET request
///
/// The status is checked before the content type, so an error page served as
/// HTML still counts as an HTTP error. No retries are attempted.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
///
/// # Returns
///
/// * `Ok(FetchedPage)` - 2xx response with an HTML body
/// * `Err(FetchError)` - Why no HTML page was obtained
pub async fn fetch_page(client: &Client, url: &Url) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return Err(FetchError::NotHtml { content_type });
    }

    let body = response.text().await.map_err(classify_error)?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network("Request timeout".to_string())
    } else if e.is_connect() {
        FetchError::Network(format!("Connection failed: {}", e))
    } else if e.is_redirect() {
        FetchError::Network(format!("Redirect error: {}", e))
    } else {
        FetchError::Network(e.to_string())
    }
}
