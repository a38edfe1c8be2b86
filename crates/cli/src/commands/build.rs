//! `mazewalk build` — Build a tree over text files and print its outline.

use std::path::PathBuf;

use mazewalk_config::AppConfig;
use mazewalk_tree::SemanticTree;

use super::{Models, build_tree, read_documents};

pub async fn run(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let models = Models::from_config(&config)?;
    let documents = read_documents(files)?;

    let Some(tree) = build_tree(&config, &models.builder, &documents).await? else {
        println!("Nothing to index: the input files contain no text.");
        return Ok(());
    };

    print!("{}", tree.outline());
    println!();
    print!("{}", stats(&tree, models.builder.width()));

    Ok(())
}

fn stats(tree: &SemanticTree, width: usize) -> String {
    let layers = tree
        .layer_widths()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" / ");
    format!(
        "  Width:   {width}\n  Nodes:   {}\n  Leaves:  {}\n  Depth:   {}\n  Layers:  {layers}\n",
        tree.node_count(),
        tree.leaf_count(),
        tree.depth()
    )
}
