pub mod extractor;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use ureq::Agent;
use url::Url;

use self::extractor::extract_faqs;
use crate::config::ScraperConfig;
use crate::corpus::FaqRecord;

/// HTTP client wrapper with rate limiting and retry logic
#[derive(Debug)]
pub struct HttpClient {
    agent: Agent,
    config: ScraperConfig,
    last_request_time: Option<Instant>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    #[inline]
    pub fn new(config: ScraperConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .user_agent(&config.user_agent)
            .build()
            .into();

        Self {
            agent,
            config,
            last_request_time: None,
        }
    }

    /// Perform an HTTP GET request with rate limiting and retry logic
    #[inline]
    pub async fn get(&mut self, url: &str) -> Result<String> {
        self.apply_rate_limit().await;

        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!("Retrying request to {} (attempt {})", url, attempt + 1);
                sleep(Duration::from_secs(self.config.retry_delay_seconds)).await;
            }

            match self.try_get(url) {
                Ok(response) => {
                    debug!("Successfully fetched {} (attempt {})", url, attempt + 1);
                    return Ok(response);
                }
                Err(e) if is_retryable_error(&e) && attempt < self.config.max_retries => {
                    warn!("Retryable error for {}: {}", url, e);
                    last_error = Some(e);
                }
                Err(e) => {
                    error!("Non-retryable error for {}: {}", url, e);
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow!("All retry attempts failed")))
    }

    /// Apply rate limiting by sleeping if necessary
    async fn apply_rate_limit(&mut self) {
        if let Some(last_time) = self.last_request_time {
            let elapsed = last_time.elapsed();
            let rate_limit_duration = Duration::from_millis(self.config.rate_limit_ms);

            if elapsed < rate_limit_duration {
                let sleep_duration = rate_limit_duration - elapsed;
                debug!("Rate limiting: sleeping for {:?}", sleep_duration);
                sleep(sleep_duration).await;
            }
        }

        self.last_request_time = Some(Instant::now());
    }

    /// Attempt a single HTTP GET request without retry logic
    fn try_get(&self, url: &str) -> Result<String> {
        debug!("Making HTTP GET request to: {}", url);

        match self.agent.get(url).call() {
            Ok(mut response) => {
                let text = response
                    .body_mut()
                    .read_to_string()
                    .with_context(|| format!("Failed to read response body from {}", url))?;
                debug!("Successfully read {} bytes from {}", text.len(), url);
                Ok(text)
            }
            Err(ureq::Error::StatusCode(status)) => {
                debug!("HTTP request failed with status {}: {}", status, url);
                Err(anyhow!("HTTP error {}", status))
            }
            Err(e) => {
                debug!("HTTP request failed with transport error: {}", e);
                Err(anyhow::Error::from(e))
                    .with_context(|| format!("Failed to make HTTP request to {}", url))
            }
        }
    }
}

impl Default for HttpClient {
    #[inline]
    fn default() -> Self {
        Self::new(ScraperConfig::default())
    }
}

/// Check if an error is retryable (network timeouts, 5xx errors, 429)
fn is_retryable_error(error: &anyhow::Error) -> bool {
    let error_str = format!("{:#}", error).to_lowercase();

    if error_str.contains("timeout")
        || error_str.contains("timed out")
        || error_str.contains("connection")
        || error_str.contains("network")
    {
        return true;
    }

    error_str.contains("http error 5") || error_str.contains("http error 429")
}

/// Validate and normalize a URL
#[inline]
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str).with_context(|| format!("Invalid URL format: {}", url_str))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("URL must use HTTP or HTTPS scheme: {}", url_str));
    }

    if url.host_str().is_none() {
        return Err(anyhow!("URL must have a valid host: {}", url_str));
    }

    Ok(url)
}

/// Find the FAQ sub-pages linked from the seed page.
///
/// Keeps anchors whose raw `href` contains `link_marker`, resolved against the
/// seed and restricted to the seed's host. Fragments are dropped, so one page
/// reached through several anchors is fetched once.
#[inline]
pub fn discover_faq_pages(html: &str, seed_url: &Url, link_marker: &str) -> Result<Vec<Url>> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| anyhow!("Failed to create CSS selector: {:?}", e))?;

    let mut links = BTreeSet::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();

        if href.starts_with("mailto:")
            || href.starts_with("javascript:")
            || href.starts_with('#')
            || !href.contains(link_marker)
        {
            continue;
        }

        match seed_url.join(href) {
            Ok(mut absolute_url) => {
                absolute_url.set_fragment(None);
                if absolute_url.host() == seed_url.host()
                    && (absolute_url.scheme() == "http" || absolute_url.scheme() == "https")
                {
                    links.insert(absolute_url);
                } else {
                    debug!("Skipping off-site FAQ link: {}", absolute_url);
                }
            }
            Err(e) => {
                debug!(
                    "Failed to resolve URL '{}' relative to '{}': {}",
                    href, seed_url, e
                );
            }
        }
    }

    info!("Discovered {} FAQ pages on {}", links.len(), seed_url);
    Ok(links.into_iter().collect())
}

/// Counters for one acquisition run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquisitionStats {
    /// FAQ pages discovered on the seed page
    pub discovered_pages: usize,
    /// Pages that yielded at least one FAQ
    pub scraped_pages: usize,
    /// Pages fetched successfully but without qualifying headings
    pub empty_pages: usize,
    /// Pages skipped because of a network or parse error
    pub failed_pages: usize,
    pub duration: Duration,
}

/// Records gathered by a scrape, in page then document order
#[derive(Debug, Clone, Default)]
pub struct Acquisition {
    pub records: Vec<FaqRecord>,
    pub stats: AcquisitionStats,
}

/// Scrapes question/answer pairs from a support site
pub struct FaqScraper {
    http_client: HttpClient,
    config: ScraperConfig,
}

impl FaqScraper {
    #[inline]
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            http_client: HttpClient::new(config.clone()),
            config,
        }
    }

    /// Best-effort scrape of every FAQ page linked from the seed page.
    ///
    /// Never fails: an unreachable seed yields an empty acquisition and a
    /// failing page is logged and skipped.
    #[inline]
    pub async fn acquire(&mut self) -> Acquisition {
        let start_time = Instant::now();
        let mut acquisition = Acquisition::default();

        let pages = match self.discover_pages().await {
            Ok(pages) => pages,
            Err(e) => {
                warn!("Failed to fetch FAQ category links: {:#}", e);
                acquisition.stats.duration = start_time.elapsed();
                return acquisition;
            }
        };
        acquisition.stats.discovered_pages = pages.len();

        let bar = if console::user_attended_stderr() {
            ProgressBar::new(pages.len() as u64).with_style(
                ProgressStyle::with_template("{spinner} [{pos}/{len}] Scraping {msg}")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        for url in &pages {
            bar.set_message(url.to_string());
            match self.scrape_page(url).await {
                Ok(records) if records.is_empty() => {
                    warn!("No FAQs found at: {}", url);
                    acquisition.stats.empty_pages += 1;
                }
                Ok(records) => {
                    info!("Scraped {} FAQs from: {}", records.len(), url);
                    acquisition.stats.scraped_pages += 1;
                    acquisition.records.extend(records);
                }
                Err(e) => {
                    warn!("Failed to scrape {}: {:#}", url, e);
                    acquisition.stats.failed_pages += 1;
                }
            }
            bar.inc(1);
        }
        bar.finish_and_clear();

        acquisition.stats.duration = start_time.elapsed();
        info!(
            "Acquisition finished: {} FAQs from {}/{} pages ({} empty, {} failed) in {:?}",
            acquisition.records.len(),
            acquisition.stats.scraped_pages,
            acquisition.stats.discovered_pages,
            acquisition.stats.empty_pages,
            acquisition.stats.failed_pages,
            acquisition.stats.duration
        );

        acquisition
    }

    async fn discover_pages(&mut self) -> Result<Vec<Url>> {
        let seed_url = validate_url(&self.config.seed_url)?;
        let html = self
            .http_client
            .get(seed_url.as_str())
            .await
            .with_context(|| format!("Failed to fetch seed page {}", seed_url))?;

        discover_faq_pages(&html, &seed_url, &self.config.link_marker)
    }

    async fn scrape_page(&mut self, url: &Url) -> Result<Vec<FaqRecord>> {
        let html = self.http_client.get(url.as_str()).await?;
        extract_faqs(&html, url, self.config.min_question_words)
    }
}
