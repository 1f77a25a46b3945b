use super::*;
use crate::config::EmbeddingProviderKind;
use crate::corpus::{CacheFile, FaqRecord};
use crate::embeddings::HashEmbeddingProvider;
use crate::search::SimilarityMetric;
use tempfile::TempDir;

fn demo_session(metric: SimilarityMetric) -> SearchSession {
    let mut config = Config::default();
    config.search.metric = metric;
    let corpus = Corpus::new(
        vec![
            FaqRecord::new(
                "How to apply for an IPO?",
                "Use the IPO section in the app.",
                "https://example.com/support/ipo/",
            ),
            FaqRecord::new(
                "How to place a bracket order?",
                "Select 'Bracket Order' on the order screen.",
                "https://example.com/support/orders/",
            ),
            FaqRecord::new(
                "How to reset my trading password?",
                "Use 'Forgot Password' on the login screen.",
                "https://example.com/support/account/",
            ),
        ],
        CorpusOrigin::Fallback,
    );

    SearchSession::from_parts(config, Box::new(HashEmbeddingProvider::default()), &corpus)
        .expect("session should build")
}

#[test]
fn query_returns_best_match_first() {
    for metric in [SimilarityMetric::Cosine, SimilarityMetric::Euclidean] {
        let session = demo_session(metric);

        let hits = session
            .handle_query("apply for IPO")
            .expect("query should succeed")
            .expect("non-empty query should search");

        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].record.question, "How to apply for an IPO?");
        assert_eq!(hits[0].record.url, "https://example.com/support/ipo/");
    }
}

#[test]
fn empty_query_is_a_no_op() {
    let session = demo_session(SimilarityMetric::Cosine);

    assert_eq!(session.handle_query("").expect("empty query is not an error"), None);
    assert_eq!(session.handle_query("   \t").expect("blank query is not an error"), None);
}

#[test]
fn limit_caps_results() {
    let session = demo_session(SimilarityMetric::Cosine);

    let hits = session
        .handle_query_with_limit("password", 1)
        .expect("query should succeed")
        .expect("non-empty query should search");

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.question, "How to reset my trading password?");
}

#[test]
fn session_reports_corpus_state() {
    let session = demo_session(SimilarityMetric::Euclidean);

    assert_eq!(session.len(), 3);
    assert!(!session.is_empty());
    assert_eq!(session.origin(), CorpusOrigin::Fallback);
    assert_eq!(session.index().metric(), SimilarityMetric::Euclidean);
    assert_eq!(session.config().search.top_k, 5);
}

fn offline_config(base_dir: &std::path::Path) -> Config {
    let mut config = Config {
        base_dir: base_dir.to_path_buf(),
        ..Config::default()
    };
    config.embedding.provider = EmbeddingProviderKind::Hash;
    config.scraper.seed_url = "http://127.0.0.1:9/support/".to_string();
    config.scraper.timeout_seconds = 1;
    config.scraper.max_retries = 0;
    config.scraper.rate_limit_ms = 0;
    config
}

#[tokio::test]
async fn initialize_offline_uses_fallback() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config = offline_config(temp_dir.path());

    let mut session = SearchSession::initialize(config)
        .await
        .expect("session should initialize");

    assert_eq!(session.origin(), CorpusOrigin::Fallback);
    assert_eq!(session.len(), 4);

    session.refresh().await.expect("refresh should succeed");
    assert_eq!(session.origin(), CorpusOrigin::Fallback);
    assert_eq!(session.len(), 4);
}

#[tokio::test]
async fn offline_refresh_keeps_cached_corpus() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let config = offline_config(temp_dir.path());
    let mut cached = vec![FaqRecord::new(
        "How to pledge my shares?",
        "Use the pledge screen.",
        "https://example.com/support/pledge/",
    )];
    cached.extend((1..10).map(|i| {
        FaqRecord::new(
            format!("What is support topic number {}?", i),
            "",
            "https://example.com/support/",
        )
    }));
    CacheFile::new(config.cache_file_path())
        .save(&cached)
        .expect("should save cache");

    let mut session = SearchSession::initialize(config)
        .await
        .expect("session should initialize");
    assert_eq!(session.origin(), CorpusOrigin::Cache);
    assert_eq!(session.len(), 10);

    session.refresh().await.expect("refresh should succeed");

    assert_eq!(session.origin(), CorpusOrigin::Cache);
    assert_eq!(session.len(), 10);
    let hits = session
        .handle_query("pledge shares")
        .expect("query should succeed")
        .expect("non-empty query should search");
    assert_eq!(hits[0].record.question, "How to pledge my shares?");
}

#[tokio::test]
async fn offline_refresh_without_cache_keeps_live_index() {
    let temp_dir = TempDir::new().expect("should create TempDir successfully");
    let mut config = offline_config(temp_dir.path());
    config.cache.enabled = false;
    let corpus = Corpus::new(
        vec![
            FaqRecord::new("How to pledge my shares?", "", ""),
            FaqRecord::new("How to add funds online?", "", ""),
        ],
        CorpusOrigin::Live,
    );
    let mut session =
        SearchSession::from_parts(config, Box::new(HashEmbeddingProvider::default()), &corpus)
            .expect("session should build");

    session.refresh().await.expect("refresh should succeed");

    assert_eq!(session.origin(), CorpusOrigin::Live);
    assert_eq!(session.len(), 2);
    assert_eq!(
        session.index().entries()[0].record.question,
        "How to pledge my shares?"
    );
}
