//! HTML parser for extracting text chunks and links
//!
//! This module handles parsing HTML content to extract:
//! - Readable text, segmented into chunks at blank lines
//! - Links to follow, each with a human-readable label
//!
//! `scraper::Html` is not `Send`, so a page is parsed and fully consumed in a
//! single synchronous call; only owned data leaves this module.

use crate::url::normalize;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Elements whose subtrees never contribute text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

/// Label used for anchors without visible text
pub const DEFAULT_LINK_TEXT: &str = "link";

/// A link found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL with the fragment removed
    pub url: Url,

    /// Whitespace-normalized anchor text, or `"link"`
    pub text: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Text chunks in document order
    pub chunks: Vec<String>,

    /// Links in document order (empty when discovery was not requested)
    pub links: Vec<DiscoveredLink>,
}

/// Parses HTML content and extracts chunks and, optionally, links
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The URL the page was served from, for resolving links
/// * `discover` - Whether to collect links at all
///
/// # Example
///
/// ```
/// use sumi_harvest::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><p>Hello</p><a href="/next">Next</a></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &base, true);
/// assert_eq!(parsed.chunks, vec!["Hello\nNext".to_string()]);
/// assert_eq!(parsed.links[0].url.as_str(), "https://example.com/next");
/// ```
pub fn parse_page(html: &str, base_url: &Url, discover: bool) -> ParsedPage {
    let document = Html::parse_document(html);

    let chunks = extract_chunks(&document);
    let links = if discover {
        discover_links(&document, base_url)
    } else {
        Vec::new()
    };

    ParsedPage { chunks, links }
}

/// Extracts visible text and splits it into chunks
///
/// Text nodes outside skipped subtrees are trimmed, empty ones dropped, and
/// the rest joined with newlines. The result is split wherever a line holds
/// only whitespace; each chunk is trimmed and empty chunks are dropped.
pub fn extract_chunks(document: &Html) -> Vec<String> {
    let mut pieces = Vec::new();
    collect_text(document.root_element(), &mut pieces);

    split_chunks(&pieces.join("\n"))
}

fn collect_text(element: ElementRef<'_>, pieces: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    pieces.push(trimmed.to_string());
                }
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, pieces);
                }
            }
            _ => {}
        }
    }
}

fn split_chunks(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            push_chunk(&mut chunks, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_chunk(&mut chunks, &current);

    chunks
}

fn push_chunk(chunks: &mut Vec<String>, lines: &[&str]) {
    let chunk = lines.join("\n");
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

/// Collects every `a[href]` outside the skipped regions
///
/// Anchors inside navigation, header, footer, aside, script or style
/// subtrees are ignored, matching what `extract_chunks` reads. Hrefs are
/// resolved against `base_url` with the fragment removed; hrefs that cannot
/// be resolved are dropped. Scope filtering happens later.
pub fn discover_links(document: &Html, base_url: &Url) -> Vec<DiscoveredLink> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter(|anchor| !in_skipped_region(*anchor))
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = match normalize(base_url, href) {
                Ok(url) => url,
                Err(e) => {
                    tracing::trace!("Dropping unresolvable href {:?}: {}", href, e);
                    return None;
                }
            };
            Some(DiscoveredLink {
                url,
                text: link_text(anchor),
            })
        })
        .collect()
}

fn in_skipped_region(anchor: ElementRef<'_>) -> bool {
    anchor.ancestors().any(|node| {
        node.value()
            .as_element()
            .map_or(false, |el| SKIPPED_ELEMENTS.contains(&el.name()))
    })
}

fn link_text(anchor: ElementRef<'_>) -> String {
    let words: Vec<&str> = anchor.text().flat_map(str::split_whitespace).collect();
    if words.is_empty() {
        DEFAULT_LINK_TEXT.to_string()
    } else {
        words.join(" ")
    }
}
