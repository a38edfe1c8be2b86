//! `mazewalk config` — Configuration management commands.

use mazewalk_config::AppConfig;

pub async fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();

            if config.fragment.max_chars < config.models.summary_chars {
                warnings.push("fragment.max_chars is below models.summary_chars; summaries will not compress leaves");
            }

            if config.tree.single_window_chars == 0 {
                warnings.push("tree.single_window_chars = 0 disables single-leaf trees");
            }

            if config.models.min_relevance <= 0.0 {
                warnings.push("models.min_relevance <= 0 means the evaluator never backtracks");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Width:      {}", config.tree.width);
            println!("   Top-k:      {}", config.search.top_k);
            println!(
                "   Fragments:  {} chars (overlap {})",
                config.fragment.max_chars, config.fragment.overlap
            );
            println!("   Embedding:  {} dims", config.models.embedding_dim);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub async fn show(defaults: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render(defaults)?);
    Ok(())
}

fn render(defaults: bool) -> Result<String, Box<dyn std::error::Error>> {
    if defaults {
        return Ok(AppConfig::default_toml());
    }
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(config.to_toml())
}

pub async fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}
