//! # Mazewalk Core
//!
//! Domain types, capability traits, and error definitions for the mazewalk
//! semantic tree. This crate has **zero framework dependencies** — it defines
//! the boundary that the tree engine and every model implementation are
//! written against.
//!
//! ## Design Philosophy
//!
//! Every external model call is a trait here. Implementations live in their
//! respective crates. This enables:
//! - Building different trees with different models side by side
//! - Easy testing with scripted mock capabilities
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod model;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ModelError, Result, TreeError};
pub use model::{
    Candidate, Distance, Embedding, Encoder, Evaluator, Proximity, SearchHit, Selection,
    Summarizer,
};
