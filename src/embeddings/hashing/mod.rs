
use anyhow::Result;

use super::EmbeddingProvider;

pub const DEFAULT_HASH_DIMENSION: u32 = 384;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Bag-of-words embedding: each lowercase alphanumeric token is hashed into a
/// bucket, and the counts are L2-normalized.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    dim: usize,
    model_id: String,
}

impl HashEmbeddingProvider {
    #[inline]
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(8);
        Self {
            dim,
            model_id: format!("token-hash-{dim}"),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];

        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let idx = (fnv1a(token.as_bytes()) % self.dim as u64) as usize;
            v[idx] += 1.0;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }

        v
    }
}

impl Default for HashEmbeddingProvider {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSION as usize)
    }
}

impl EmbeddingProvider for HashEmbeddingProvider {
    #[inline]
    fn model_id(&self) -> &str {
        &self.model_id
    }

    #[inline]
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |h, b| {
        (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}
