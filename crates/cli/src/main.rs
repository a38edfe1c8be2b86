//! mazewalk CLI — the main entry point.
//!
//! Commands:
//! - `build`   — Build a semantic tree over text files and print its outline
//! - `query`   — Build a tree and run a guided search over it
//! - `config`  — Show, locate, or validate the configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "mazewalk",
    about = "mazewalk — navigable semantic trees over long documents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a semantic tree over text files and print it
    Build {
        /// UTF-8 text files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Search a semantic tree built over text files
    Query {
        /// UTF-8 text files to index
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// The question to answer
        #[arg(short, long)]
        query: String,

        /// Maximum number of results (overrides config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Collect the siblings of every accepted fragment
        #[arg(long)]
        fuzz: bool,

        /// Judge leaves on their original text instead of their summary
        #[arg(long)]
        original_text: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        /// Print the built-in defaults instead, ready to save as config.toml
        #[arg(long)]
        defaults: bool,
    },
    /// Print the configuration file path
    Path,
    /// Check the configuration for errors
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { files } => commands::build::run(&files).await?,
        Commands::Query {
            files,
            query,
            top_k,
            fuzz,
            original_text,
            json,
        } => {
            let overrides = commands::query::Overrides {
                top_k,
                fuzz,
                original_text,
            };
            commands::query::run(&files, &query, overrides, json).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { defaults } => commands::config_cmd::show(defaults).await?,
            ConfigAction::Path => commands::config_cmd::path().await?,
            ConfigAction::Validate => commands::config_cmd::validate().await?,
        },
    }

    Ok(())
}
