//! Indented text rendering of a tree, for debugging and the CLI.

use std::fmt::Write;

use crate::node::{NodeKind, SemanticTree};

/// Longest text shown per line before it is cut with an ellipsis.
const PREVIEW_CHARS: usize = 96;

impl SemanticTree {
    /// Render the tree one node per line, children indented under parents.
    ///
    /// Leaves show their summary followed by a `>` line with the original
    /// text.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize)];

        while let Some((id, level)) = stack.pop() {
            let node = &self[id];
            let indent = "  ".repeat(level);
            let _ = match node.kind() {
                NodeKind::Root => writeln!(
                    out,
                    "{indent}[root] depth={} leaves={}",
                    self.depth(),
                    self.leaf_count()
                ),
                NodeKind::Internal => writeln!(
                    out,
                    "{indent}[{level}.{}] {}",
                    node.sibling_index().unwrap_or_default(),
                    preview(node.summary())
                ),
                NodeKind::Leaf => writeln!(
                    out,
                    "{indent}[{level}.{}] {}\n{indent}  > {}",
                    node.sibling_index().unwrap_or_default(),
                    preview(node.summary()),
                    preview(node.raw_content())
                ),
            };
            stack.extend(node.children().iter().rev().map(|&c| (c, level + 1)));
        }
        out
    }
}

/// Single-line, length-capped view of `text`.
fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= PREVIEW_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(PREVIEW_CHARS - 1).collect();
    cut.push('…');
    cut
}
