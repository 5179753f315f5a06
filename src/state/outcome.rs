/// Terminal outcome definitions for processed frontier entries
///
/// Every entry a worker takes from the frontier ends in exactly one of these
/// outcomes, which is what the navigation log records.
use std::fmt;

/// Final state of one frontier entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Page was fetched and its text extracted
    Scraped,

    /// robots.txt forbids the URL for our user agent
    DeniedByRobots,

    /// Response was not `text/html`
    SkippedNotHtml,

    /// Fetch failed (HTTP status or network error)
    Failed(String),
}

impl PageOutcome {
    /// Returns true if this represents a successful completion
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Scraped)
    }

    /// Returns true if the page was intentionally not fetched or not parsed
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::DeniedByRobots | Self::SkippedNotHtml)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Short machine-friendly label, used for statistics keys
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scraped => "scraped",
            Self::DeniedByRobots => "denied_by_robots",
            Self::SkippedNotHtml => "skipped_not_html",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    /// Formats the outcome exactly as it appears in the navigation log
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scraped => write!(f, "scraped"),
            Self::DeniedByRobots => write!(f, "denied by robots.txt"),
            Self::SkippedNotHtml => write!(f, "skipped (not HTML)"),
            Self::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
