//! Subcommand implementations and the document pipeline they share.

pub mod build;
pub mod config_cmd;
pub mod query;

use std::path::PathBuf;
use std::sync::Arc;

use mazewalk_config::AppConfig;
use mazewalk_models::{CosineDistance, HashingEncoder, LeadSummarizer, SimilarityEvaluator};
use mazewalk_tree::{FragmentOptions, SemanticTree, TreeBuilder, fragment};
use tracing::info;

/// Read every file as UTF-8 text, in the order given.
pub fn read_documents(files: &[PathBuf]) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).map_err(|e| -> Box<dyn std::error::Error> {
                format!("Failed to read {}: {e}", path.display()).into()
            })
        })
        .collect()
}

/// The built-in model stack described by `config.models`.
pub struct Models {
    pub builder: TreeBuilder,
    pub evaluator: SimilarityEvaluator,
}

impl Models {
    pub fn from_config(config: &AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let encoder = Arc::new(HashingEncoder::new(config.models.embedding_dim));
        let builder = TreeBuilder::new(
            Arc::new(LeadSummarizer::new(config.models.summary_chars)),
            encoder.clone(),
            Arc::new(CosineDistance),
            config.tree.width,
        )?;
        let evaluator = SimilarityEvaluator::new(encoder, config.models.min_relevance);
        Ok(Self { builder, evaluator })
    }
}

/// Build a tree over `documents`.
///
/// Content that fits in `tree.single_window_chars` becomes a single-leaf
/// tree; anything longer is fragmented and clustered. Returns `None` when
/// the documents hold no text.
pub async fn build_tree(
    config: &AppConfig,
    builder: &TreeBuilder,
    documents: &[String],
) -> Result<Option<SemanticTree>, Box<dyn std::error::Error>> {
    if documents.iter().all(|d| d.trim().is_empty()) {
        return Ok(None);
    }

    let total_chars: usize = documents.iter().map(|d| d.chars().count()).sum();
    if total_chars <= config.tree.single_window_chars {
        info!(total_chars, "Content fits one window, building pseudo tree");
        let text = documents.join("\n");
        return Ok(Some(builder.build_pseudo(&text).await?));
    }

    let options = FragmentOptions {
        max_chars: config.fragment.max_chars,
        overlap: config.fragment.overlap,
        merge: config.fragment.merge,
    };
    let fragments = fragment(documents, &options);
    info!(
        documents = documents.len(),
        fragments = fragments.len(),
        "Documents fragmented"
    );
    Ok(builder.build(&fragments).await?)
}
