//! FAQ corpus materialization
//!
//! Turns scraped records into the table the index is built from, preferring a
//! cached scrape and falling back to a small demo table when nothing could be
//! acquired.

pub mod cache;


use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

pub use self::cache::{CacheFile, CacheStatus};
use crate::Result;
use crate::config::Config;
use crate::crawler::FaqScraper;

/// One question/answer pair and the page it was found on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub question: String,
    /// Empty when the page had no element after the question heading
    pub answer: String,
    pub url: String,
}

impl FaqRecord {
    #[inline]
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            url: url.into(),
        }
    }
}

/// Where the rows of a corpus came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorpusOrigin {
    Cache,
    Live,
    Fallback,
}

impl fmt::Display for CorpusOrigin {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cache => write!(f, "cached scrape"),
            Self::Live => write!(f, "live site"),
            Self::Fallback => write!(f, "fallback demo data"),
        }
    }
}

/// Ordered FAQ records; a record's position is its identity in the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    records: Vec<FaqRecord>,
    origin: CorpusOrigin,
}

impl Corpus {
    /// Wrap already-validated records
    #[inline]
    pub fn new(records: Vec<FaqRecord>, origin: CorpusOrigin) -> Self {
        Self { records, origin }
    }

    /// Corpus from freshly acquired records, or the fallback table if there are none
    #[inline]
    pub fn materialize(acquired: Vec<FaqRecord>, fallback_url: &str) -> Self {
        if acquired.is_empty() {
            warn!("No FAQs found from the live site. Loading fallback demo data.");
            return Self::fallback(fallback_url);
        }

        Self::new(acquired, CorpusOrigin::Live)
    }

    #[inline]
    pub fn fallback(url: &str) -> Self {
        Self::new(fallback_records(url), CorpusOrigin::Fallback)
    }

    #[inline]
    pub fn records(&self) -> &[FaqRecord] {
        &self.records
    }

    #[inline]
    pub fn origin(&self) -> CorpusOrigin {
        self.origin
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn questions(&self) -> Vec<String> {
        self.records.iter().map(|r| r.question.clone()).collect()
    }

    #[inline]
    pub fn into_records(self) -> Vec<FaqRecord> {
        self.records
    }
}

/// Demo FAQs used when the live site yields nothing
#[inline]
pub fn fallback_records(url: &str) -> Vec<FaqRecord> {
    vec![
        FaqRecord::new(
            "How to apply for an IPO?",
            "You can apply via the IPO section in your app or on the website.",
            url,
        ),
        FaqRecord::new(
            "How to place a bracket order?",
            "Go to the order placement screen, select 'Bracket Order' and define your target and stoploss.",
            url,
        ),
        FaqRecord::new(
            "What are the brokerage charges?",
            "They depend on the plan you're subscribed to. Check the Charges section for details.",
            url,
        ),
        FaqRecord::new(
            "How to reset my password?",
            "Use the 'Forgot Password' option on the login screen to reset.",
            url,
        ),
    ]
}

/// Builds the session corpus: fresh cache, then live scrape, then fallback
pub struct CorpusBuilder<'a> {
    config: &'a Config,
}

impl<'a> CorpusBuilder<'a> {
    #[inline]
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Produce a non-empty corpus.
    ///
    /// With `force_refresh` the cache is ignored and the site is scraped again.
    /// A scrape that yields nothing keeps the existing cache rows, if any,
    /// before falling back to the demo table. A fresh cache file with the wrong
    /// shape is an error, not a reason to re-scrape.
    #[inline]
    pub async fn build(&self, force_refresh: bool) -> Result<Corpus> {
        let cache = self.cache_file();

        if let Some(cache) = &cache {
            if force_refresh {
                info!("Refresh requested, ignoring cache at {}", cache.path().display());
            } else if cache.is_fresh(self.config.cache.ttl())? {
                let records = cache.load()?;
                if records.is_empty() {
                    warn!("Cache file {} has no rows, re-scraping", cache.path().display());
                } else {
                    info!("Loaded cached FAQ data from previous scrape ({} rows)", records.len());
                    return Ok(Corpus::new(records, CorpusOrigin::Cache));
                }
            }
        }

        let mut scraper = FaqScraper::new(self.config.scraper.clone());
        let acquisition = scraper.acquire().await;

        if let Some(cache) = &cache {
            if !acquisition.records.is_empty() {
                if let Err(e) = cache.save(&acquisition.records) {
                    warn!("Failed to write FAQ cache {}: {}", cache.path().display(), e);
                }
            } else if let Some(records) = Self::previous_scrape(cache) {
                return Ok(Corpus::new(records, CorpusOrigin::Cache));
            }
        }

        Ok(Corpus::materialize(
            acquisition.records,
            &self.config.scraper.seed_url,
        ))
    }

    /// Stale or bypassed cache rows, used when a live scrape yields nothing
    fn previous_scrape(cache: &CacheFile) -> Option<Vec<FaqRecord>> {
        if !cache.exists() {
            return None;
        }

        match cache.load() {
            Ok(records) if !records.is_empty() => {
                warn!(
                    "No FAQs found from the live site. Keeping {} rows from {}",
                    records.len(),
                    cache.path().display()
                );
                Some(records)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring unreadable FAQ cache {}: {}", cache.path().display(), e);
                None
            }
        }
    }

    fn cache_file(&self) -> Option<CacheFile> {
        self.config
            .cache
            .enabled
            .then(|| CacheFile::new(self.config.cache_file_path()))
    }
}
