//! Feature-hashing encoder.
//!
//! Every lower-cased word token is hashed with SHA-256 into one of `dim`
//! buckets with a hash-derived sign, and the resulting vector is
//! L2-normalized. Texts sharing vocabulary land close together under cosine
//! similarity, which is all the tree needs for clustering.

use async_trait::async_trait;
use mazewalk_core::{Embedding, Encoder, ModelError};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone)]
pub struct HashingEncoder {
    dim: usize,
}

impl HashingEncoder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(256)
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

#[async_trait]
impl Encoder for HashingEncoder {
    fn name(&self) -> &str {
        "hashing"
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    async fn encode(&self, text: &str) -> Result<Embedding, ModelError> {
        if self.dim == 0 {
            return Err(ModelError::EncodingFailed(
                "embedding dimension must be > 0".into(),
            ));
        }

        let mut v = vec![0.0f32; self.dim];
        for token in tokens(text) {
            let digest = Sha256::digest(token.as_bytes());
            let bucket = digest[..8]
                .iter()
                .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
            let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
            v[(bucket % self.dim as u64) as usize] += sign;
        }

        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(v)
    }
}
