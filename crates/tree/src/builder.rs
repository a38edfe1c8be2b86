//! Tree builder — bottom-up construction of a [`SemanticTree`].
//!
//! # Flow
//!
//! 1. Summarize every fragment and encode the summary into a leaf
//! 2. Partition the current layer into groups of at most `width`
//! 3. Summarize each group's joined summaries into a new internal node
//! 4. Once a new layer has at most `width` nodes, hang it under the root;
//!    otherwise go back to step 2 with the new layer
//!
//! Capability calls are awaited one at a time. Any failure aborts the build
//! and is returned unchanged.

use std::sync::Arc;

use mazewalk_core::{Distance, Embedding, Encoder, ModelError, Result, Summarizer, TreeError};
use tracing::{debug, info, warn};

use crate::node::{Node, SemanticTree};
use crate::partition::partition;

/// Separator placed between member summaries before summarizing a group.
const GROUP_SEPARATOR: &str = "\n\n";

/// Builds semantic trees with one fixed set of model capabilities.
///
/// A builder holds no per-build state, so one instance can build several
/// independent trees concurrently.
pub struct TreeBuilder {
    summarizer: Arc<dyn Summarizer>,
    encoder: Arc<dyn Encoder>,
    distance: Arc<dyn Distance>,
    width: usize,
}

impl TreeBuilder {
    /// Create a builder producing nodes with at most `width` children.
    ///
    /// `width` must be at least 2; with a single child per node a layer
    /// would never shrink.
    pub fn new(
        summarizer: Arc<dyn Summarizer>,
        encoder: Arc<dyn Encoder>,
        distance: Arc<dyn Distance>,
        width: usize,
    ) -> std::result::Result<Self, TreeError> {
        if width < 2 {
            return Err(TreeError::InvalidWidth(width));
        }
        Ok(Self {
            summarizer,
            encoder,
            distance,
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Build a layered tree over `fragments`.
    ///
    /// Returns `Ok(None)` for an empty fragment list.
    pub async fn build(&self, fragments: &[String]) -> Result<Option<SemanticTree>> {
        if fragments.is_empty() {
            debug!("No fragments, nothing to build");
            return Ok(None);
        }

        info!(
            fragments = fragments.len(),
            width = self.width,
            summarizer = self.summarizer.name(),
            encoder = self.encoder.name(),
            distance = self.distance.name(),
            "Building semantic tree"
        );

        let mut tree = SemanticTree::with_root();

        let mut layer = Vec::with_capacity(fragments.len());
        for fragment in fragments {
            let summary = self.summarize(fragment).await?;
            let embedding = self.encode(&summary).await?;
            layer.push(tree.push(Node::leaf(summary, embedding, fragment.clone())));
        }
        debug!(leaves = layer.len(), "Leaf layer created");

        let mut level = 1;
        loop {
            let groups = partition(layer, self.width, self.distance.proximity(), |a, b| {
                self.distance.distance(tree[*a].embedding(), tree[*b].embedding())
            })?;

            let mut next = Vec::with_capacity(groups.len());
            for group in groups {
                let combined = group
                    .iter()
                    .map(|&id| tree[id].summary())
                    .collect::<Vec<_>>()
                    .join(GROUP_SEPARATOR);
                let summary = self.summarize(&combined).await?;
                let embedding = self.encode(&summary).await?;
                let parent = tree.push(Node::internal(summary, embedding));
                tree.attach_children(parent, group)?;
                next.push(parent);
            }
            debug!(level, nodes = next.len(), "Layer built");

            if next.len() <= self.width {
                let root = tree.root();
                tree.attach_children(root, next)?;
                break;
            }
            layer = next;
            level += 1;
        }

        info!(
            nodes = tree.node_count(),
            depth = tree.depth(),
            "Semantic tree built"
        );
        Ok(Some(tree))
    }

    /// Wrap `text` as a single leaf under the root, skipping summarization.
    ///
    /// For content that already fits one context window, where clustering
    /// buys nothing.
    pub async fn build_pseudo(&self, text: &str) -> Result<SemanticTree> {
        let embedding = self.encode(text).await?;
        let mut tree = SemanticTree::with_root();
        let leaf = tree.push(Node::leaf(text.to_string(), embedding, text.to_string()));
        let root = tree.root();
        tree.attach_children(root, vec![leaf])?;
        debug!(chars = text.chars().count(), "Pseudo tree built");
        Ok(tree)
    }

    async fn summarize(&self, text: &str) -> std::result::Result<String, ModelError> {
        let summary = self.summarizer.summarize(text).await?;
        if summary.trim().is_empty() {
            warn!(
                summarizer = self.summarizer.name(),
                input_chars = text.chars().count(),
                "Summarizer returned an empty summary"
            );
        }
        Ok(summary)
    }

    async fn encode(&self, text: &str) -> std::result::Result<Embedding, ModelError> {
        let embedding = self.encoder.encode(text).await?;
        let expected = self.encoder.dimension();
        if embedding.len() != expected {
            return Err(ModelError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            });
        }
        Ok(embedding)
    }
}
