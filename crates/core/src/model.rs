//! Capability traits — the model-driven functions a tree is built and
//! searched with.
//!
//! The tree engine never summarizes, embeds, or judges relevance itself.
//! It orchestrates four injected capabilities:
//! - [`Summarizer`]: compress a text into a shorter representative summary
//! - [`Encoder`]: turn a text into a fixed-dimension embedding
//! - [`Distance`]: score two embeddings for clustering
//! - [`Evaluator`]: pick the next branch during a guided search
//!
//! Implementations: LLM-backed services in the embedding application, and
//! offline deterministic ones in `mazewalk-models`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::ModelError;

/// A fixed-size numeric vector produced by an [`Encoder`].
pub type Embedding = Vec<f32>;

/// Which direction of a [`Distance`] score means "closer".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Proximity {
    /// Similarity scores such as cosine: larger values are closer.
    #[default]
    HigherIsCloser,
    /// Metric distances such as Euclidean: smaller values are closer.
    LowerIsCloser,
}

impl Proximity {
    /// Order two scores so that the closer one sorts first.
    ///
    /// Incomparable scores (NaN) compare as equal, leaving a stable sort
    /// to keep their existing order.
    pub fn closer_first(self, a: f32, b: f32) -> Ordering {
        let ord = match self {
            Proximity::HigherIsCloser => b.partial_cmp(&a),
            Proximity::LowerIsCloser => a.partial_cmp(&b),
        };
        ord.unwrap_or(Ordering::Equal)
    }
}

/// One child exposed to an [`Evaluator`] during a search step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// The child's position within its parent's children.
    pub index: usize,

    /// The text exposed for judgment (summary, or raw leaf text).
    pub text: String,

    /// The child's cached embedding.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Embedding,
}

/// An evaluator's verdict on a candidate batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Descend into (or accept) the candidate at this position in the batch.
    Child(usize),
    /// None of the candidates is relevant; reject the current node.
    Backtrack,
}

/// A single search result: original fragment text and its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub text: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Embedding,
}

/// Compresses a longer text into a shorter representative summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// The capability name (e.g., "lead", "openai:gpt-4o-mini").
    fn name(&self) -> &str;

    /// Summarize `text`.
    async fn summarize(&self, text: &str) -> Result<String, ModelError>;
}

/// Produces embeddings. Every call within one tree must share the same
/// dimensionality and metric space.
#[async_trait]
pub trait Encoder: Send + Sync {
    fn name(&self) -> &str;

    /// Length of every embedding this encoder returns.
    fn dimension(&self) -> usize;

    async fn encode(&self, text: &str) -> Result<Embedding, ModelError>;
}

/// Symmetric scoring function used when clustering a layer.
///
/// The declared [`Proximity`] tells the partitioner which end of the score
/// range is "near".
pub trait Distance: Send + Sync {
    fn name(&self) -> &str;

    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32, ModelError>;

    fn proximity(&self) -> Proximity {
        Proximity::HigherIsCloser
    }
}

/// Relevance judge consulted at every step of a guided search.
///
/// Given the currently exposed candidates and the query, it returns the
/// position of the chosen candidate in `candidates`, or
/// [`Selection::Backtrack`]. Returning a position outside the batch is a
/// contract violation.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn name(&self) -> &str;

    async fn select(&self, candidates: &[Candidate], query: &str)
    -> Result<Selection, ModelError>;
}
