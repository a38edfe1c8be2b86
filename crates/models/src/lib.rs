//! Offline model capabilities for mazewalk.
//!
//! Deterministic, dependency-light stand-ins for the language and embedding
//! models a production deployment would plug in. They make the CLI usable
//! without network access and give integration tests stable behaviour.

pub mod distance;
pub mod encoder;
pub mod evaluator;
pub mod summarizer;

pub use distance::{CosineDistance, EuclideanDistance, cosine_similarity};
pub use encoder::HashingEncoder;
pub use evaluator::SimilarityEvaluator;
pub use summarizer::LeadSummarizer;
