//! Request/response handling for FAQ queries
//!
//! A [`SearchSession`] owns the expensive state (embedding provider, corpus
//! and index), built once by [`SearchSession::initialize`]. Each user query is
//! answered by [`SearchSession::handle_query`] without touching that state;
//! [`SearchSession::refresh`] rebuilds it on request.

#[cfg(test)]
mod tests;

use std::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::corpus::{Corpus, CorpusBuilder, CorpusOrigin};
use crate::embeddings::{EmbeddingProvider, create_provider};
use crate::search::{FaqIndex, SearchHit};
use crate::{FaqError, Result};

pub struct SearchSession {
    config: Config,
    provider: Box<dyn EmbeddingProvider>,
    origin: CorpusOrigin,
    index: FaqIndex,
}

impl SearchSession {
    /// Load the embedding model, build the corpus and embed it
    #[inline]
    pub async fn initialize(config: Config) -> Result<Self> {
        let start_time = Instant::now();

        let provider = create_provider(&config.embedding)
            .map_err(|e| FaqError::Embedding(format!("{:#}", e)))?;
        let corpus = CorpusBuilder::new(&config).build(false).await?;
        let session = Self::from_parts(config, provider, &corpus)?;

        info!(
            "Search session ready with {} FAQs from {} in {:?}",
            session.len(),
            session.origin,
            start_time.elapsed()
        );
        Ok(session)
    }

    /// Session over an existing corpus and provider
    #[inline]
    pub fn from_parts(
        config: Config,
        provider: Box<dyn EmbeddingProvider>,
        corpus: &Corpus,
    ) -> Result<Self> {
        let index = FaqIndex::build(corpus, &provider, config.search.metric)?;

        Ok(Self {
            config,
            provider,
            origin: corpus.origin(),
            index,
        })
    }

    /// Answer one query with the configured number of results.
    ///
    /// A blank query is not searched and yields `None`.
    #[inline]
    pub fn handle_query(&self, query: &str) -> Result<Option<Vec<SearchHit>>> {
        self.handle_query_with_limit(query, self.config.search.top_k)
    }

    #[inline]
    pub fn handle_query_with_limit(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Option<Vec<SearchHit>>> {
        let query = query.trim();
        if query.is_empty() {
            debug!("Ignoring empty query");
            return Ok(None);
        }

        let hits = self.index.search_text(&self.provider, query, limit)?;
        debug!("Query {:?} matched {} FAQs", query, hits.len());
        Ok(Some(hits))
    }

    /// Re-scrape the site, rewrite the cache and re-embed with the same provider.
    ///
    /// Scraped or cached FAQs are never replaced by the demo table.
    #[inline]
    pub async fn refresh(&mut self) -> Result<()> {
        info!("Refreshing FAQ corpus");
        let corpus = CorpusBuilder::new(&self.config).build(true).await?;
        if corpus.origin() == CorpusOrigin::Fallback && self.origin != CorpusOrigin::Fallback {
            warn!(
                "Refresh found no FAQs, keeping the current {} FAQs from {}",
                self.len(),
                self.origin
            );
            return Ok(());
        }
        self.index = FaqIndex::build(&corpus, &self.provider, self.config.search.metric)?;
        self.origin = corpus.origin();
        info!("Corpus refreshed: {} FAQs from {}", self.len(), self.origin);
        Ok(())
    }

    #[inline]
    pub fn origin(&self) -> CorpusOrigin {
        self.origin
    }

    #[inline]
    pub fn index(&self) -> &FaqIndex {
        &self.index
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
