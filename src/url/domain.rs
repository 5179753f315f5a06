use url::Url;

/// Extracts the crawl domain from a URL
///
/// The domain is the lowercase host followed by `:port` when the URL carries a
/// non-default port, so `http://127.0.0.1:8080/` and `http://127.0.0.1/` are
/// different sites. User info is never part of the domain.
///
/// # Returns
///
/// * `Some(String)` - The domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_harvest::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:3000/").unwrap();
/// assert_eq!(extract_domain(&url), Some("localhost:3000".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
