// Embeddings module
// Sentence embedding providers: Ollama for real models, token hashing for offline use

pub mod hashing;
pub mod ollama;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{EmbeddingConfig, EmbeddingProviderKind};

pub use hashing::HashEmbeddingProvider;
pub use ollama::OllamaClient;

/// Maps text to fixed-dimension vectors.
///
/// The same instance must embed both the corpus and every query; `model_id`
/// identifies it so an index can refuse vectors from a different model.
pub trait EmbeddingProvider {
    fn model_id(&self) -> &str;

    /// Embed `texts` in order, one vector per input
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .context("Embedding provider returned no vector")
    }
}

impl EmbeddingProvider for Box<dyn EmbeddingProvider> {
    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }
}

/// Construct the configured provider. Done once per session.
#[inline]
pub fn create_provider(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingProvider>> {
    match config.provider {
        EmbeddingProviderKind::Ollama => {
            let client = OllamaClient::new(config).context("Failed to create Ollama client")?;
            client
                .health_check()
                .context("Ollama is not ready for embedding")?;
            Ok(Box::new(client))
        }
        EmbeddingProviderKind::Hash => {
            info!(
                "Using token-hashing embeddings with {} dimensions",
                config.embedding_dimension
            );
            Ok(Box::new(HashEmbeddingProvider::new(
                config.embedding_dimension as usize,
            )))
        }
    }
}
