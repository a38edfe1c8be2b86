//! `mazewalk query` — Build a tree over text files and search it.

use std::path::PathBuf;

use mazewalk_config::AppConfig;
use mazewalk_core::SearchHit;
use mazewalk_tree::SearchOptions;

use super::{Models, build_tree, read_documents};

/// Search settings given on the command line, layered over the config.
#[derive(Debug, Default)]
pub struct Overrides {
    pub top_k: Option<usize>,
    pub fuzz: bool,
    pub original_text: bool,
}

impl Overrides {
    fn apply(&self, config: &AppConfig) -> SearchOptions {
        SearchOptions {
            top_k: self.top_k.unwrap_or(config.search.top_k),
            original_text: self.original_text || config.search.original_text,
            fuzz: self.fuzz || config.search.fuzz,
        }
    }
}

pub async fn run(
    files: &[PathBuf],
    query: &str,
    overrides: Overrides,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let models = Models::from_config(&config)?;
    let documents = read_documents(files)?;
    let options = overrides.apply(&config);

    let hits = match build_tree(&config, &models.builder, &documents).await? {
        Some(mut tree) => tree.search(query, &models.evaluator, &options).await?,
        None => Vec::new(),
    };

    if json {
        println!("{}", render_json(&hits)?);
        return Ok(());
    }

    println!("🔍 \"{query}\"");
    println!();
    if hits.is_empty() {
        println!("   No relevant fragments found.");
    } else {
        for (i, hit) in hits.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, hit.text.trim());
        }
    }

    Ok(())
}

/// Hits as a JSON array of `{ "rank", "text" }`; embeddings are left out.
fn render_json(hits: &[SearchHit]) -> Result<String, serde_json::Error> {
    let items: Vec<serde_json::Value> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| serde_json::json!({ "rank": i + 1, "text": hit.text }))
        .collect();
    serde_json::to_string_pretty(&items)
}
