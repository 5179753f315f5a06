use crate::UrlError;
use url::Url;

/// Resolves a link against the page it was found on
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace from `href`
/// 2. Resolve it relative to `base` (absolute hrefs replace the base)
/// 3. Remove the fragment (everything after #)
///
/// Scheme and host casing are canonicalized by the URL parser, so applying
/// `normalize` to its own output returns the same URL.
///
/// # Arguments
///
/// * `base` - URL of the page containing the link
/// * `href` - The raw `href` attribute value
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL without fragment
/// * `Err(UrlError)` - `href` could not be resolved
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::normalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = normalize(&base, "setup#install").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs/setup");
/// ```
pub fn normalize(base: &Url, href: &str) -> Result<Url, UrlError> {
    let mut url = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", href, e)))?;

    url.set_fragment(None);

    Ok(url)
}

/// Parses an absolute URL string and strips its fragment
pub fn normalize_absolute(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    #[test]
    fn test_resolve_relative_path() {
        let result = normalize(&base(), "other").unwrap();
        assert_eq!(result.as_str(), "https://example.com/docs/other");
    }

    #[test]
    fn test_resolve_root_relative() {
        let result = normalize(&base(), "/about").unwrap();
        assert_eq!(result.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_parent_segments() {
        let result = normalize(&base(), "../a/./b").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a/b");
    }

    #[test]
    fn test_absolute_href_replaces_base() {
        let result = normalize(&base(), "http://other.test/b").unwrap();
        assert_eq!(result.as_str(), "http://other.test/b");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize(&base(), "/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_fragment_only_resolves_to_base() {
        let result = normalize(&base(), "#top").unwrap();
        assert_eq!(result.as_str(), "https://example.com/docs/page");
    }

    #[test]
    fn test_query_is_kept() {
        let result = normalize(&base(), "/search?q=rust&page=2").unwrap();
        assert_eq!(result.as_str(), "https://example.com/search?q=rust&page=2");
    }

    #[test]
    fn test_trims_whitespace() {
        let result = normalize(&base(), "  /spaced \n").unwrap();
        assert_eq!(result.as_str(), "https://example.com/spaced");
    }

    #[test]
    fn test_scheme_and_host_lowercased() {
        let result = normalize(&base(), "HTTPS://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let hrefs = [
            "/a/b#frag",
            "HTTP://Example.COM/x?y=1#z",
            "../up",
            "https://example.com:8443/port",
        ];

        for href in hrefs {
            let once = normalize(&base(), href).unwrap();
            let twice = normalize(&once, once.as_str()).unwrap();
            assert_eq!(once, twice, "normalize not idempotent for {}", href);
        }
    }

    #[test]
    fn test_mailto_resolves_but_keeps_scheme() {
        let result = normalize(&base(), "mailto:test@example.com").unwrap();
        assert_eq!(result.scheme(), "mailto");
    }

    #[test]
    fn test_normalize_absolute() {
        let result = normalize_absolute("https://EXAMPLE.com/a#b").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_normalize_absolute_invalid_scheme() {
        let result = normalize_absolute("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_normalize_absolute_malformed() {
        assert!(normalize_absolute("not a url").is_err());
    }
}
