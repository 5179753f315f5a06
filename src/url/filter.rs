//! Scope filter deciding which discovered URLs may enter the frontier

use crate::url::extract_domain;
use std::fmt;
use url::Url;

/// Path extensions that never lead to crawlable HTML
const EXCLUDED_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "ico", "tif", "tiff",
    // documents and archives
    "pdf", "zip", "gz", "tgz", "tar", "rar", "7z", "bz2", "xz",
    // audio
    "mp3", "wav", "ogg", "flac", "aac", "m4a",
    // video
    "mp4", "m4v", "avi", "mov", "mkv", "webm", "wmv", "flv",
    // stylesheets and scripts
    "css", "js", "mjs",
];

/// Why a URL was kept out of the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeRejection {
    /// Scheme other than http or https
    UnsupportedScheme(String),
    /// Host (and port) differ from the crawl domain
    OffDomain(String),
    /// Path ends in a static-asset extension
    StaticAsset(String),
}

impl fmt::Display for ScopeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedScheme(scheme) => write!(f, "unsupported scheme '{}'", scheme),
            Self::OffDomain(domain) => write!(f, "off-domain host '{}'", domain),
            Self::StaticAsset(ext) => write!(f, "static asset '.{}'", ext),
        }
    }
}

/// Checks whether `url` belongs to the crawl and says why not when it doesn't
///
/// A URL is in scope when its scheme is http or https, its domain (host plus
/// explicit port) equals `domain`, and its path does not end in one of the
/// excluded static-asset extensions (compared case-insensitively).
pub fn check_scope(url: &Url, domain: &str) -> Result<(), ScopeRejection> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScopeRejection::UnsupportedScheme(url.scheme().to_string()));
    }

    match extract_domain(url) {
        Some(url_domain) if url_domain == domain => {}
        Some(url_domain) => return Err(ScopeRejection::OffDomain(url_domain)),
        None => return Err(ScopeRejection::OffDomain(String::new())),
    }

    if let Some(ext) = excluded_extension(url.path()) {
        return Err(ScopeRejection::StaticAsset(ext));
    }

    Ok(())
}

/// Returns true if `url` may be enqueued for a crawl of `domain`
///
/// # Examples
///
/// ```
/// use sumi_harvest::url::is_in_scope;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/guide").unwrap();
/// let image = Url::parse("https://example.com/logo.PNG").unwrap();
/// let other = Url::parse("https://other.com/guide").unwrap();
///
/// assert!(is_in_scope(&page, "example.com"));
/// assert!(!is_in_scope(&image, "example.com"));
/// assert!(!is_in_scope(&other, "example.com"));
/// ```
pub fn is_in_scope(url: &Url, domain: &str) -> bool {
    check_scope(url, domain).is_ok()
}

/// Returns the lowercase extension of the last path segment if it is excluded
fn excluded_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next()?;
    let (_, ext) = last_segment.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();

    if EXCLUDED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_domain_page_in_scope() {
        assert!(is_in_scope(&url("http://example.test/a"), "example.test"));
        assert!(is_in_scope(&url("https://example.test/"), "example.test"));
    }

    #[test]
    fn test_other_domain_rejected() {
        assert_eq!(
            check_scope(&url("http://other.test/b"), "example.test"),
            Err(ScopeRejection::OffDomain("other.test".to_string()))
        );
    }

    #[test]
    fn test_subdomain_rejected() {
        assert!(!is_in_scope(&url("https://www.example.test/"), "example.test"));
    }

    #[test]
    fn test_port_must_match() {
        assert!(is_in_scope(&url("http://127.0.0.1:8080/a"), "127.0.0.1:8080"));
        assert!(!is_in_scope(&url("http://127.0.0.1:9090/a"), "127.0.0.1:8080"));
        assert!(!is_in_scope(&url("http://127.0.0.1/a"), "127.0.0.1:8080"));
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        assert_eq!(
            check_scope(&url("mailto:someone@example.test"), "example.test"),
            Err(ScopeRejection::UnsupportedScheme("mailto".to_string()))
        );
        assert!(!is_in_scope(&url("ftp://example.test/file"), "example.test"));
        assert!(!is_in_scope(&url("javascript:void(0)"), "example.test"));
    }

    #[test]
    fn test_static_assets_rejected() {
        for path in [
            "/logo.png",
            "/photo.JPG",
            "/docs/manual.pdf",
            "/dist/app.js",
            "/styles/site.css",
            "/media/clip.mp4",
            "/audio/track.mp3",
            "/release.tar.gz",
        ] {
            let candidate = url(&format!("https://example.test{}", path));
            assert!(
                matches!(
                    check_scope(&candidate, "example.test"),
                    Err(ScopeRejection::StaticAsset(_))
                ),
                "{} should be rejected",
                path
            );
        }
    }

    #[test]
    fn test_html_like_paths_kept() {
        for path in ["/page.html", "/index.php", "/guide", "/v1.2/notes", "/js/"] {
            let candidate = url(&format!("https://example.test{}", path));
            assert!(is_in_scope(&candidate, "example.test"), "{} should be kept", path);
        }
    }

    #[test]
    fn test_extension_in_query_ignored() {
        assert!(is_in_scope(
            &url("https://example.test/view?file=image.png"),
            "example.test"
        ));
    }

    #[test]
    fn test_scope_filter_is_stable_after_normalize() {
        let base = url("https://example.test/docs/");
        let once = crate::url::normalize(&base, "Page#x").unwrap();
        let twice = crate::url::normalize(&base, once.as_str()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(
            is_in_scope(&once, "example.test"),
            is_in_scope(&twice, "example.test")
        );
    }
}
