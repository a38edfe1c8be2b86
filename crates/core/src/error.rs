//! Error types for the mazewalk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all mazewalk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model capability errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Tree structure errors ---
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures reported by injected model capabilities.
///
/// The tree engine never retries or swallows these; they surface to the
/// caller exactly as the capability produced them.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Distance computation failed: {0}")]
    DistanceFailed(String),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Error)]
pub enum TreeError {
    #[error("Invalid cluster width: {0}")]
    InvalidWidth(usize),

    #[error("Unknown node id: {0}")]
    UnknownNode(usize),
}
