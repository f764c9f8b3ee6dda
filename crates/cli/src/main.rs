//! rxnrag CLI: the main entry point.
//!
//! Commands:
//! - `tokenize` — Split SMILES into tokens and vocabulary ids
//! - `embed`    — Print embedding vectors for SMILES
//! - `search`   — Nearest stored reactions for a query
//! - `prompt`   — Build a reaction-prediction prompt
//! - `index`    — Create the embedding matrix and HNSW index files
//! - `config`   — Show, locate or validate configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rxnrag_core::{Direction, PromptVariant};

mod commands;

#[derive(Parser)]
#[command(
    name = "rxnrag",
    about = "rxnrag: retrieval-augmented prompts for chemical reaction prediction",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Config file (defaults to ~/.rxnrag/config.toml)
    #[arg(short, long, global = true, env = "RXNRAG_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split SMILES into tokens and vocabulary ids
    Tokenize {
        #[arg(required = true)]
        smiles: Vec<String>,

        /// Read each argument as JSON: a string or an array of strings
        #[arg(long)]
        json: bool,
    },

    /// Print one embedding vector (JSON array) per SMILES
    Embed {
        #[arg(required = true)]
        smiles: Vec<String>,

        /// Read each argument as JSON: a string or an array of strings
        #[arg(long)]
        json: bool,
    },

    /// Find the stored reactions nearest to a query
    Search {
        smiles: String,

        /// Number of neighbors (defaults to retriever.top_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Build a prompt for one query
    Prompt {
        /// Query SMILES (reactants forward, products backward)
        #[arg(short, long)]
        input: String,

        /// Prompt variant, e.g. base, rag, rag_v2
        #[arg(long)]
        variant: Option<PromptVariant>,

        /// forward or backward
        #[arg(long)]
        direction: Option<Direction>,

        /// Expert-model prediction (repeatable, best first)
        #[arg(short, long = "expert")]
        experts: Vec<String>,

        /// JSON file with an array of support examples
        #[arg(long)]
        support: Option<PathBuf>,
    },

    /// Index file management
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum IndexAction {
    /// Embed one field of every record into a .npy matrix
    Embed {
        /// Record field to embed (defaults to the direction's input role)
        #[arg(short, long)]
        field: Option<String>,

        /// Output path (defaults to retriever.embeddings_path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Records per embedding batch
        #[arg(long, default_value_t = 64)]
        batch_size: usize,
    },

    /// Build the HNSW index from the embedding matrix and save it
    Build {
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Load and validate the configuration
    Validate,
    /// Print the default configuration
    Default,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Tokenize { smiles, json } => {
            let batch = commands::smiles_batch(&smiles, json)?;
            commands::tokenize::run(config, batch)?
        }
        Commands::Embed { smiles, json } => {
            let batch = commands::smiles_batch(&smiles, json)?;
            commands::embed::run(config, batch)?
        }
        Commands::Search { smiles, k } => commands::search::run(config, &smiles, k)?,
        Commands::Prompt {
            input,
            variant,
            direction,
            experts,
            support,
        } => commands::prompt::run(
            config,
            commands::prompt::PromptArgs {
                input,
                variant,
                direction,
                experts,
                support,
            },
        )?,
        Commands::Index { action } => match action {
            IndexAction::Embed {
                field,
                out,
                batch_size,
            } => commands::index::embed(config, field, out, batch_size)?,
            IndexAction::Build { out } => commands::index::build(config, &out)?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config)?,
            ConfigAction::Path => commands::config_cmd::path(config)?,
            ConfigAction::Validate => commands::config_cmd::validate(config)?,
            ConfigAction::Default => commands::config_cmd::default()?,
        },
    }

    Ok(())
}
