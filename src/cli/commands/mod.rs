//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod entities;
mod models;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use certylex::config::Config;

#[derive(Parser)]
#[command(name = "certylex")]
#[command(about = "Legal document review: LLM analysis, inline annotations and entity extraction")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a document and print the annotated copy
    Analyze {
        /// Plain-text document to analyze
        file: Option<PathBuf>,
        /// Use the bundled sample contract instead of a file
        #[arg(long, conflicts_with = "file")]
        sample: bool,
        /// Question to ask about the document
        #[arg(short, long)]
        question: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Sampling temperature (overrides config)
        #[arg(long)]
        temperature: Option<f32>,
        /// Nucleus sampling cutoff (overrides config)
        #[arg(long)]
        top_p: Option<f32>,
        /// Maximum tokens in the analysis reply (overrides config)
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Also extract entities, concurrently with the analysis
        #[arg(short, long)]
        entities: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract persons and ID numbers from a document
    Entities {
        /// Plain-text document to scan
        file: Option<PathBuf>,
        /// Use the bundled sample contract instead of a file
        #[arg(long, conflicts_with = "file")]
        sample: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP API server
    Serve {
        /// Address to bind (port, host, or host:port). Defaults to config.
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show LLM configuration and list available models
    Models,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)
            .await
            .map_err(|e| anyhow::anyhow!(e))?,
        None => Config::load().await,
    };

    match cli.command {
        Commands::Analyze {
            file,
            sample,
            question,
            model,
            temperature,
            top_p,
            max_tokens,
            entities,
            json,
        } => {
            analyze::cmd_analyze(
                &config,
                analyze::AnalyzeArgs {
                    file,
                    sample,
                    question,
                    model,
                    temperature,
                    top_p,
                    max_tokens,
                    entities,
                    json,
                },
            )
            .await
        }
        Commands::Entities { file, sample, json } => {
            entities::cmd_entities(&config, file.as_deref(), sample, json).await
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            serve::cmd_serve(&config, &bind).await
        }
        Commands::Models => models::cmd_models(&config).await,
    }
}
