//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::sync::Arc;
use std::time::Duration;
use sumi_harvest::crawler::Coordinator;
use sumi_harvest::embed::HashingEmbedder;
use sumi_harvest::output::{ChannelSink, TracingSink};
use sumi_harvest::{crawl, CrawlConfig, CrawlResults, PageOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawl configuration for the mock server with no delay
fn test_config(server: &MockServer, max_depth: u32) -> CrawlConfig {
    CrawlConfig::new(&format!("{}/", server.uri()))
        .expect("Failed to build config")
        .with_max_depth(max_depth)
        .with_delay(Duration::ZERO)
        .expect("Invalid delay")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

async fn run(config: CrawlConfig) -> CrawlResults {
    crawl(config, Arc::new(TracingSink))
        .await
        .expect("Crawl failed")
}

#[tokio::test]
async fn test_depth_zero_fetches_only_seed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>Welcome to the site</p><a href="/about">About</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/about", "<p>About</p>", 0).await;

    let results = run(test_config(&server, 0)).await;

    assert_eq!(results.documents.len(), 1);
    let document = &results.documents[0];
    assert_eq!(document.url, format!("{}/", server.uri()));
    assert_eq!(document.path, "Home");
    assert_eq!(document.chunks[0].text, "Welcome to the site\nAbout");
    assert!(document.chunks[0].vector.is_none());

    assert_eq!(results.navigation_log_text(), "Home ==> scraped");
}

#[tokio::test]
async fn test_off_domain_links_are_never_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    mount_page(
        &server,
        "/",
        &format!(
            r#"<p>Home</p><a href="{}/elsewhere">Away</a><a href="/about">About us</a>"#,
            other.uri()
        ),
        1,
    )
    .await;
    mount_page(&server, "/about", "<p>About page</p>", 1).await;
    mount_page(&other, "/elsewhere", "<p>Other site</p>", 0).await;

    let results = run(test_config(&server, 2)).await;

    assert_eq!(results.documents.len(), 2);
    assert!(results
        .documents
        .iter()
        .all(|d| !d.url.starts_with(&other.uri())));

    let log = results.navigation_log_text();
    assert!(log.contains("Home ==> scraped"));
    assert!(log.contains("Home -> About us ==> scraped"));
    assert!(!log.contains("Away"));
}

#[tokio::test]
async fn test_navigation_links_are_not_followed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<nav><a href="/menu">Menu</a></nav><p>Main text</p>"#,
        1,
    )
    .await;
    mount_page(&server, "/menu", "<p>Menu page</p>", 0).await;

    let results = run(test_config(&server, 1)).await;

    assert_eq!(results.navigation_log_text(), "Home ==> scraped");
    assert_eq!(results.documents.len(), 1);
}

#[tokio::test]
async fn test_robots_disallow_records_denial() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;

    mount_page(
        &server,
        "/",
        r#"<p>Index</p><a href="/private/data">Secret</a><a href="/public">Open</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/private/data", "<p>Hidden</p>", 0).await;
    mount_page(&server, "/public", "<p>Visible</p>", 1).await;

    let results = run(test_config(&server, 1)).await;

    let log = results.navigation_log_text();
    assert!(log.contains("Home -> Secret ==> denied by robots.txt"));
    assert!(log.contains("Home -> Open ==> scraped"));
    assert_eq!(results.documents.len(), 2);
    assert!(results
        .navigation_log
        .iter()
        .any(|entry| entry.outcome == PageOutcome::DeniedByRobots));
}

#[tokio::test]
async fn test_forbidden_robots_denies_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    mount_page(&server, "/", "<p>Never read</p>", 0).await;

    let results = run(test_config(&server, 2)).await;

    assert!(results.documents.is_empty());
    assert_eq!(results.navigation_log_text(), "Home ==> denied by robots.txt");
}

#[tokio::test]
async fn test_http_error_recorded_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let results = run(test_config(&server, 2)).await;

    assert!(results.documents.is_empty());
    assert_eq!(
        results.navigation_log_text(),
        "Home ==> failed (HTTP Error: 500)"
    );
}

#[tokio::test]
async fn test_failed_page_does_not_stop_the_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>Index</p><a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>Still reachable</p>", 1).await;

    let results = run(test_config(&server, 1)).await;

    let log = results.navigation_log_text();
    assert!(log.contains("Home -> Broken ==> failed (HTTP Error: 500)"));
    assert!(log.contains("Home -> Ok ==> scraped"));
    assert_eq!(results.navigation_log.len(), 3);
    assert_eq!(results.documents.len(), 2);
}

#[tokio::test]
async fn test_non_html_content_is_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<p>Index</p><a href="/feed">Feed</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"items\": []}", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results = run(test_config(&server, 1)).await;

    assert_eq!(results.documents.len(), 1);
    assert!(results
        .navigation_log_text()
        .contains("Home -> Feed ==> skipped (not HTML)"));
}

#[tokio::test]
async fn test_static_assets_are_not_requested() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>Gallery</p><a href="/photo.JPG">Photo</a><a href="/report.pdf">Report</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/photo.JPG"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let results = run(test_config(&server, 2)).await;

    assert_eq!(results.navigation_log.len(), 1);
}

#[tokio::test]
async fn test_vectorize_attaches_one_vector_per_chunk() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<div>First chunk of text\n\nSecond chunk of text</div>",
        1,
    )
    .await;

    let config = test_config(&server, 0).with_vectorize(true);
    let coordinator = Coordinator::new(config)
        .expect("Failed to build coordinator")
        .with_embedder(Arc::new(HashingEmbedder::new(384)));
    let results = coordinator.run().await.expect("Crawl failed");

    assert_eq!(results.documents.len(), 1);
    let chunks = &results.documents[0].chunks;
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].text, "First chunk of text");
    assert_eq!(chunks[1].text, "Second chunk of text");
    for chunk in chunks {
        assert_eq!(chunk.vector.as_ref().map(Vec::len), Some(384));
    }

    let (json, _) = results.serialize().expect("Serialization failed");
    let parsed = CrawlResults::from_documents_json(&json).expect("Parse failed");
    assert_eq!(parsed, results.documents);
}

#[tokio::test]
async fn test_each_url_fetched_once_under_concurrency() {
    let server = MockServer::start().await;
    let links = r#"
        <a href="/a">A</a>
        <a href="/b">B</a>
        <a href="/c">C</a>
        <a href="/">Home</a>
    "#;

    for route in ["/", "/a", "/b", "/c"] {
        mount_page(
            &server,
            route,
            &format!("<p>Page {}</p>{}<a href=\"{}#top\">Self</a>", route, links, route),
            1,
        )
        .await;
    }

    let config = test_config(&server, 3)
        .with_concurrency(4)
        .expect("Invalid concurrency");
    let results = run(config).await;

    assert_eq!(results.documents.len(), 4);
    assert_eq!(results.navigation_log.len(), 4);

    let mut urls: Vec<&str> = results.documents.iter().map(|d| d.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), 4);
}

#[tokio::test]
async fn test_no_discovery_beyond_depth_limit() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<p>Root</p><a href="/level1">Level 1</a>"#, 1).await;
    mount_page(
        &server,
        "/level1",
        r#"<p>One</p><a href="/level2">Level 2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/level2", "<p>Two</p>", 0).await;

    let results = run(test_config(&server, 1)).await;

    assert_eq!(
        results.navigation_log_text(),
        "Home ==> scraped\nHome -> Level 1 ==> scraped"
    );
}

#[tokio::test]
async fn test_progress_lines_reach_channel_sink() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Hello</p>", 1).await;

    let (sink, mut receiver) = ChannelSink::new(64);
    let results = crawl(test_config(&server, 0), Arc::new(sink))
        .await
        .expect("Crawl failed");
    assert_eq!(results.documents.len(), 1);

    let mut lines = Vec::new();
    while let Ok(line) = receiver.try_recv() {
        lines.push(line);
    }

    assert!(lines.iter().any(|l| l.starts_with("Reading robots.txt from:")));
    assert!(lines.iter().any(|l| l == "Scraping [Depth 0]: Home"));
    assert!(lines.iter().any(|l| l.starts_with("Crawl finished")));
}
