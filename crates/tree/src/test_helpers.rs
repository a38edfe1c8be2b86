//! Shared test helpers: scripted capabilities for builder and search tests.

use async_trait::async_trait;
use mazewalk_core::{
    Candidate, Distance, Embedding, Encoder, Evaluator, ModelError, Proximity, Selection,
    Summarizer,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::builder::TreeBuilder;
use crate::node::SemanticTree;

/// Summarizes to `sum(<first line>)` and records every input it sees.
#[derive(Default)]
pub struct TagSummarizer {
    inputs: Mutex<Vec<String>>,
}

impl TagSummarizer {
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for TagSummarizer {
    fn name(&self) -> &str {
        "tag"
    }

    async fn summarize(&self, text: &str) -> Result<String, ModelError> {
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(format!("sum({})", text.lines().next().unwrap_or_default()))
    }
}

/// Letter-frequency embedding: one bucket per ASCII letter.
pub struct LetterEncoder {
    calls: AtomicUsize,
}

impl LetterEncoder {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Encoder for LetterEncoder {
    fn name(&self) -> &str {
        "letters"
    }

    fn dimension(&self) -> usize {
        26
    }

    async fn encode(&self, text: &str) -> Result<Embedding, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut v = vec![0.0; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(v)
    }
}

/// Plain dot product, larger = closer.
pub struct DotDistance;

impl Distance for DotDistance {
    fn name(&self) -> &str {
        "dot"
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> Result<f32, ModelError> {
        Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
    }

    fn proximity(&self) -> Proximity {
        Proximity::HigherIsCloser
    }
}

/// Fails on every call.
pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn summarize(&self, _text: &str) -> Result<String, ModelError> {
        Err(ModelError::SummarizationFailed("model offline".into()))
    }
}

/// Letter encoder that succeeds `healthy` times, then fails every call.
pub struct FailingEncoder {
    healthy: usize,
    inner: LetterEncoder,
}

impl FailingEncoder {
    pub fn after(healthy: usize) -> Self {
        Self {
            healthy,
            inner: LetterEncoder::new(),
        }
    }
}

#[async_trait]
impl Encoder for FailingEncoder {
    fn name(&self) -> &str {
        "failing"
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn encode(&self, text: &str) -> Result<Embedding, ModelError> {
        if self.inner.calls() >= self.healthy {
            return Err(ModelError::EncodingFailed("embedding service down".into()));
        }
        self.inner.encode(text).await
    }
}

/// Returns embeddings of the wrong length.
pub struct ShortEncoder;

#[async_trait]
impl Encoder for ShortEncoder {
    fn name(&self) -> &str {
        "short"
    }

    fn dimension(&self) -> usize {
        8
    }

    async fn encode(&self, _text: &str) -> Result<Embedding, ModelError> {
        Ok(vec![1.0; 3])
    }
}

/// Replays a fixed list of selections, then backtracks forever.
/// Every batch it was shown is recorded.
#[derive(Default)]
pub struct ScriptedEvaluator {
    script: Mutex<VecDeque<Selection>>,
    batches: Mutex<Vec<Vec<Candidate>>>,
}

impl ScriptedEvaluator {
    pub fn new(script: Vec<Selection>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batches(&self) -> Vec<Vec<Candidate>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.batches.lock().unwrap().len()
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn select(
        &self,
        candidates: &[Candidate],
        _query: &str,
    ) -> Result<Selection, ModelError> {
        self.batches.lock().unwrap().push(candidates.to_vec());
        Ok(self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Selection::Backtrack))
    }
}

/// Always picks the first candidate.
#[derive(Default)]
pub struct FirstEvaluator {
    calls: AtomicUsize,
}

impl FirstEvaluator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for FirstEvaluator {
    fn name(&self) -> &str {
        "first"
    }

    async fn select(
        &self,
        _candidates: &[Candidate],
        _query: &str,
    ) -> Result<Selection, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Selection::Child(0))
    }
}

pub fn builder(width: usize) -> TreeBuilder {
    TreeBuilder::new(
        Arc::new(TagSummarizer::default()),
        Arc::new(LetterEncoder::new()),
        Arc::new(DotDistance),
        width,
    )
    .unwrap()
}

pub fn fragments(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

pub async fn build(texts: &[&str], width: usize) -> SemanticTree {
    builder(width)
        .build(&fragments(texts))
        .await
        .unwrap()
        .expect("non-empty input builds a tree")
}

pub const SENTENCES: [&str; 7] = [
    "The borrow checker enforces aliasing rules at compile time.",
    "Ownership moves values between bindings.",
    "Lifetimes annotate how long references stay valid.",
    "Tokio schedules asynchronous tasks on a thread pool.",
    "Futures do nothing until they are polled.",
    "Cargo resolves crate dependencies from a registry.",
    "Workspaces share one lockfile across member crates.",
];
