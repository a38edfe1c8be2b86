//! Embedding-similarity evaluator.
//!
//! Scores each candidate by cosine similarity between the query embedding
//! and the candidate's cached embedding, picks the best one, and backtracks
//! when even the best falls below `min_score`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mazewalk_core::{Candidate, Embedding, Encoder, Evaluator, ModelError, Selection};
use tracing::{debug, warn};

use crate::distance::cosine_similarity;

pub struct SimilarityEvaluator {
    encoder: Arc<dyn Encoder>,
    min_score: f32,
    /// Last query and its embedding; a search asks about one query many times.
    query_cache: Mutex<Option<(String, Embedding)>>,
}

impl SimilarityEvaluator {
    pub fn new(encoder: Arc<dyn Encoder>, min_score: f32) -> Self {
        Self {
            encoder,
            min_score,
            query_cache: Mutex::new(None),
        }
    }

    /// The query cache, recovered if a panicking thread poisoned it.
    fn cache(&self) -> MutexGuard<'_, Option<(String, Embedding)>> {
        self.query_cache.lock().unwrap_or_else(|poisoned| {
            warn!("Query cache lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn cached_query(&self, query: &str) -> Option<Embedding> {
        self.cache()
            .as_ref()
            .filter(|(cached, _)| cached == query)
            .map(|(_, embedding)| embedding.clone())
    }

    async fn query_embedding(&self, query: &str) -> Result<Embedding, ModelError> {
        if let Some(embedding) = self.cached_query(query) {
            return Ok(embedding);
        }

        let embedding = self.encoder.encode(query).await?;
        *self.cache() = Some((query.to_string(), embedding.clone()));
        Ok(embedding)
    }

    async fn candidate_embedding(
        &self,
        candidate: &Candidate,
        dim: usize,
    ) -> Result<Embedding, ModelError> {
        if candidate.embedding.len() == dim {
            Ok(candidate.embedding.clone())
        } else {
            self.encoder.encode(&candidate.text).await
        }
    }
}

#[async_trait]
impl Evaluator for SimilarityEvaluator {
    fn name(&self) -> &str {
        "similarity"
    }

    async fn select(
        &self,
        candidates: &[Candidate],
        query: &str,
    ) -> Result<Selection, ModelError> {
        if candidates.is_empty() {
            return Ok(Selection::Backtrack);
        }

        let query_embedding = self.query_embedding(query).await?;
        let mut best: Option<(usize, f32)> = None;
        for (position, candidate) in candidates.iter().enumerate() {
            let embedding = self
                .candidate_embedding(candidate, query_embedding.len())
                .await?;
            let score = cosine_similarity(&query_embedding, &embedding);
            debug!(position, index = candidate.index, score, "Scored candidate");
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((position, score));
            }
        }

        match best {
            Some((position, score)) if score >= self.min_score => {
                debug!(position, score, "Selected candidate");
                Ok(Selection::Child(position))
            }
            _ => {
                debug!(min_score = self.min_score, "No candidate relevant, backtracking");
                Ok(Selection::Backtrack)
            }
        }
    }
}
