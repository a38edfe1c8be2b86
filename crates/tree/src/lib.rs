//! The semantic tree — navigate content larger than a model's context window.
//!
//! Content fragments are summarized and clustered bottom-up into a
//! balanced multi-way tree. At query time the tree is walked top-down with
//! a model-driven evaluator choosing the next branch, yielding a handful
//! of original fragments instead of the whole document.
//!
//! # Flow
//!
//! 1. Split raw text into fragments ([`fragment`])
//! 2. Summarize and encode each fragment into a leaf ([`TreeBuilder`])
//! 3. Partition each layer into groups of at most `width` ([`partition`])
//! 4. Summarize every group into a parent node, repeat until the top layer
//!    fits under the root
//! 5. Search: reset traversal state, then walk root → leaves with
//!    backtracking ([`SemanticTree::search`])

pub mod builder;
pub mod fragment;
pub mod node;
pub mod outline;
pub mod partition;
pub mod search;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use builder::TreeBuilder;
pub use fragment::{FragmentOptions, fragment};
pub use node::{Node, NodeId, NodeKind, SemanticTree, TraversalState};
pub use partition::partition;
pub use search::SearchOptions;
