use super::is_retryable_error as is_retryable_error_impl;
use super::validate_url as validate_url_impl;
use super::*;

fn seed() -> Url {
    Url::parse("https://example.com/support/").expect("url should parse")
}

#[test]
fn validate_url() {
    assert!(validate_url_impl("https://example.com").is_ok());
    assert!(validate_url_impl("http://example.com/support/").is_ok());

    assert!(validate_url_impl("ftp://example.com").is_err());
    assert!(validate_url_impl("not-a-url").is_err());
    assert!(validate_url_impl("").is_err());
    assert!(validate_url_impl("https://").is_err());
}

#[test]
fn discover_filters_by_marker() {
    let html = r#"
        <html><body>
            <a href="/support/ipo/">IPO</a>
            <a href="/support/orders/">Orders</a>
            <a href="/pricing/">Pricing</a>
            <a href="/about">About</a>
        </body></html>
    "#;

    let links = discover_faq_pages(html, &seed(), "/support/").expect("discovery should succeed");
    let links: Vec<&str> = links.iter().map(Url::as_str).collect();

    assert_eq!(
        links,
        vec![
            "https://example.com/support/ipo/",
            "https://example.com/support/orders/"
        ]
    );
}

#[test]
fn discover_deduplicates_and_drops_fragments() {
    let html = r##"
        <a href="/support/ipo/">IPO</a>
        <a href="https://example.com/support/ipo/">IPO again</a>
        <a href="/support/ipo/#faq-3">IPO question 3</a>
    "##;

    let links = discover_faq_pages(html, &seed(), "/support/").expect("discovery should succeed");

    assert_eq!(links.len(), 1);
    assert_eq!(links[0].as_str(), "https://example.com/support/ipo/");
}

#[test]
fn discover_skips_offsite_and_non_http_links() {
    let html = r##"
        <a href="https://other.example.org/support/ipo/">Elsewhere</a>
        <a href="mailto:help@example.com?subject=/support/">Mail</a>
        <a href="javascript:open('/support/')">Script</a>
        <a href="#/support/">Anchor</a>
        <a href="accounts/">Relative, no marker</a>
        <a href="../support/funds/">Relative with marker</a>
    "##;

    let links = discover_faq_pages(html, &seed(), "/support/").expect("discovery should succeed");
    let links: Vec<&str> = links.iter().map(Url::as_str).collect();

    assert_eq!(links, vec!["https://example.com/support/funds/"]);
}

#[test]
fn discover_on_page_without_links() {
    let links = discover_faq_pages("<html><body><p>Maintenance</p></body></html>", &seed(), "/support/")
        .expect("discovery should succeed");
    assert!(links.is_empty());
}

#[test]
fn is_retryable_error() {
    assert!(is_retryable_error_impl(&anyhow!("HTTP error 503")));
    assert!(is_retryable_error_impl(&anyhow!("HTTP error 429")));
    assert!(is_retryable_error_impl(&anyhow!("Connection refused")));
    assert!(is_retryable_error_impl(&anyhow!("Request timed out")));

    assert!(!is_retryable_error_impl(&anyhow!("HTTP error 404")));
    assert!(!is_retryable_error_impl(&anyhow!("HTTP error 403")));
}

#[test]
fn http_client_uses_scraper_config() {
    let config = ScraperConfig {
        timeout_seconds: 15,
        max_retries: 0,
        ..ScraperConfig::default()
    };
    let client = HttpClient::new(config);

    assert_eq!(client.config.timeout_seconds, 15);
    assert_eq!(client.config.max_retries, 0);
    assert!(client.last_request_time.is_none());
}

#[tokio::test]
async fn acquire_with_unreachable_seed_is_empty() {
    let config = ScraperConfig {
        seed_url: "http://127.0.0.1:9/support/".to_string(),
        timeout_seconds: 1,
        max_retries: 0,
        rate_limit_ms: 0,
        ..ScraperConfig::default()
    };
    let mut scraper = FaqScraper::new(config);

    let acquisition = scraper.acquire().await;

    assert!(acquisition.records.is_empty());
    assert_eq!(acquisition.stats.discovered_pages, 0);
}
