//! Robots.txt handling module
//!
//! The [`RobotsGate`] loads the crawl domain's robots.txt once before the first
//! page is fetched and then answers can-fetch questions for the rest of the run.
//! It is read-only after initialization, so workers share it without locking.

mod parser;

pub use parser::{product_token, ParsedRobots};

use reqwest::{Client, StatusCode};
use url::Url;

/// Read-only robots policy for the crawl domain
#[derive(Debug, Clone)]
pub struct RobotsGate {
    policy: ParsedRobots,
}

impl RobotsGate {
    /// Fetches and parses robots.txt for the seed's domain
    ///
    /// Never fails. An unreachable or unreadable robots.txt is treated as
    /// "allow all", except that 401 and 403 responses mean "deny all".
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client (already carrying the crawler's user agent)
    /// * `seed` - Any URL on the crawl domain
    pub async fn initialize(client: &Client, seed: &Url) -> Self {
        let robots_url = match robots_url_for(seed) {
            Some(url) => url,
            None => {
                tracing::warn!("Cannot derive robots.txt location from {}", seed);
                return Self::allow_all();
            }
        };

        tracing::debug!("Fetching robots.txt from {}", robots_url);
        Self {
            policy: fetch_policy(client, &robots_url).await,
        }
    }

    /// Builds a gate from already-downloaded robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            policy: ParsedRobots::from_content(content),
        }
    }

    /// Builds a gate that allows every URL
    pub fn allow_all() -> Self {
        Self {
            policy: ParsedRobots::allow_all(),
        }
    }

    /// Checks if `url` may be fetched by `user_agent`
    pub fn can_fetch(&self, user_agent: &str, url: &Url) -> bool {
        self.policy.is_allowed(url.as_str(), user_agent)
    }

    /// Crawl-delay advertised for `user_agent`, in seconds
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.policy.crawl_delay(user_agent)
    }
}

/// Returns `<scheme>://<authority>/robots.txt` for `url`
pub fn robots_url_for(url: &Url) -> Option<Url> {
    url.host_str()?;
    url.join("/robots.txt").ok()
}

/// Downloads robots.txt and turns the response into a policy
async fn fetch_policy(client: &Client, robots_url: &Url) -> ParsedRobots {
    let response = match client.get(robots_url.clone()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Could not read robots.txt from {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        tracing::warn!(
            "robots.txt at {} returned {}, treating site as disallowed",
            robots_url,
            status
        );
        return ParsedRobots::deny_all();
    }

    if !status.is_success() {
        tracing::info!(
            "robots.txt at {} returned {}, allowing all paths",
            robots_url,
            status
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => ParsedRobots::from_content(&body),
        Err(e) => {
            tracing::warn!("Could not read robots.txt body from {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
