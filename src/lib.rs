use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaqError>;

#[derive(Error, Debug)]
pub enum FaqError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Scraper error: {0}")]
    Scraper(String),

    #[error("FAQ data has no '{0}' column. Please check the source.")]
    MissingColumn(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Index was built with model '{index}' but queried with model '{query}'")]
    ModelMismatch { index: String, query: String },

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod commands;
pub mod config;
pub mod corpus;
pub mod crawler;
pub mod embeddings;
pub mod search;
pub mod session;
