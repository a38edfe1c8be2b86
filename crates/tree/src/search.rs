//! Guided top-k search — walk the tree top-down with an evaluator choosing
//! each branch.
//!
//! Every node moves through `Cleared → Visiting → Done | Rejected`. Closed
//! nodes are never shown to the evaluator again, so a search makes at most
//! one evaluator call per node closure or descent and always terminates.
//!
//! # Flow
//!
//! 1. Reset every node's traversal state
//! 2. At the current node, offer its open children to the evaluator
//! 3. Leaf chosen: collect it (and, in fuzz mode, all of its siblings)
//! 4. Internal node chosen: descend into it
//! 5. Nothing chosen, or nothing left to offer: close the node and climb
//!    back to its parent
//! 6. Stop at `top_k` results or when climbing past the root

use mazewalk_core::{Candidate, Evaluator, Result, SearchHit, Selection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::node::{NodeId, SemanticTree, TraversalState};

/// Knobs for one search call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of results.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Show leaves' original text to the evaluator instead of their summary.
    /// Ignored in fuzz mode.
    #[serde(default)]
    pub original_text: bool,

    /// Once a leaf is accepted, accept all of its siblings without asking.
    #[serde(default)]
    pub fuzz: bool,
}

fn default_top_k() -> usize {
    3
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            original_text: false,
            fuzz: false,
        }
    }
}

impl SemanticTree {
    /// Collect up to `options.top_k` original fragments relevant to `query`.
    ///
    /// Traversal state is reset first, so leftovers from an earlier or
    /// failed search never leak in. Evaluator errors abort the search and are
    /// returned unchanged.
    ///
    /// # Panics
    ///
    /// If the evaluator selects a position outside the batch it was shown.
    pub async fn search(
        &mut self,
        query: &str,
        evaluator: &dyn Evaluator,
        options: &SearchOptions,
    ) -> Result<Vec<SearchHit>> {
        self.reset();

        let top_k = options.top_k;
        let mut hits: Vec<SearchHit> = Vec::with_capacity(top_k);
        let mut evaluations = 0usize;
        let mut current = Some(self.root());

        while let Some(node) = current {
            if hits.len() >= top_k {
                break;
            }
            self.set_state(node, TraversalState::Visiting);

            let available: Vec<NodeId> = self[node]
                .children()
                .iter()
                .copied()
                .filter(|&child| self[child].state().is_open())
                .collect();

            if available.is_empty() {
                debug!(node = node.index(), "No open children, node done");
                self.set_state(node, TraversalState::Done);
                current = self[node].parent();
                continue;
            }

            let candidates = self.expose(&available, options);
            let selection = evaluator.select(&candidates, query).await?;
            evaluations += 1;

            match selection {
                Selection::Backtrack => {
                    debug!(node = node.index(), "Evaluator rejected node");
                    self.set_state(node, TraversalState::Rejected);
                    current = self[node].parent();
                }
                Selection::Child(position) => {
                    assert!(
                        position < available.len(),
                        "evaluator `{}` selected candidate {position} from a batch of {}",
                        evaluator.name(),
                        available.len()
                    );
                    let child = available[position];

                    if !self[child].is_leaf() {
                        debug!(from = node.index(), to = child.index(), "Descending");
                        current = Some(child);
                        continue;
                    }

                    if hits.len() < top_k {
                        hits.push(self.hit(child, self[child].raw_content()));
                    }
                    self.set_state(child, TraversalState::Done);
                    debug!(leaf = child.index(), hits = hits.len(), "Leaf accepted");

                    if options.fuzz {
                        for &sibling in self[node].children() {
                            if hits.len() >= top_k {
                                break;
                            }
                            if sibling != child {
                                hits.push(self.hit(sibling, self[sibling].content_or_summary()));
                            }
                        }
                        self.set_state(node, TraversalState::Done);
                        current = self[node].parent();
                    }
                }
            }
        }

        info!(
            hits = hits.len(),
            evaluations,
            evaluator = evaluator.name(),
            "Search finished"
        );
        Ok(hits)
    }

    /// Build the evaluator batch for `available`, marking each child visiting.
    fn expose(&mut self, available: &[NodeId], options: &SearchOptions) -> Vec<Candidate> {
        let mut candidates = Vec::with_capacity(available.len());
        for &id in available {
            let node = &self[id];
            let text = if options.original_text && !options.fuzz && node.is_leaf() {
                node.raw_content()
            } else {
                node.summary()
            };
            candidates.push(Candidate {
                index: node.sibling_index().unwrap_or_default(),
                text: text.to_string(),
                embedding: node.embedding().to_vec(),
            });
            self.set_state(id, TraversalState::Visiting);
        }
        candidates
    }

    fn hit(&self, id: NodeId, text: &str) -> SearchHit {
        SearchHit {
            text: text.to_string(),
            embedding: self[id].embedding().to_vec(),
        }
    }
}
