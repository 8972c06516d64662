mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use recollect::memory::types::StoreKind;

#[derive(Parser)]
#[command(name = "recollect", version, about = "Semantic memory and knowledge store for AI agents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport)
    Serve,
    /// Store a personal memory
    Remember {
        content: String,
        /// Origin tag recorded with the memory
        #[arg(long, default_value = "user_statement")]
        provenance: String,
        /// Importance in [0, 1]; computed from the content when omitted
        #[arg(long)]
        importance: Option<f64>,
        /// Only store the text if it contains a storage trigger phrase
        #[arg(long)]
        if_triggered: bool,
    },
    /// Add a curated document to the knowledge store
    Learn {
        content: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
    },
    /// Retrieve the records most relevant to a query
    Recall {
        query: String,
        #[arg(long, default_value = "memory")]
        store: StoreKind,
        /// Maximum number of results (defaults to the store's configured k)
        #[arg(short)]
        k: Option<usize>,
    },
    /// Show store statistics
    Stats {
        #[arg(long, default_value = "memory")]
        store: StoreKind,
    },
    /// Prune a store down to its capacity now
    Evict {
        #[arg(long, default_value = "memory")]
        store: StoreKind,
    },
    /// Export a store's records as a JSON snapshot to stdout
    Export {
        #[arg(long, default_value = "memory")]
        store: StoreKind,
    },
    /// Import records from a JSON snapshot file
    Import {
        file: PathBuf,
        #[arg(long, default_value = "memory")]
        store: StoreKind,
    },
    /// Check both snapshot files and print a health report
    Doctor,
    /// Delete a store's snapshot
    Reset {
        #[arg(long, default_value = "memory")]
        store: StoreKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = recollect::config::RecollectConfig::load()?;

    // Initialize tracing with the configured log level.
    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => server::serve_stdio(config).await?,
        Command::Remember {
            content,
            provenance,
            importance,
            if_triggered,
        } => cli::remember::remember(&config, &content, &provenance, importance, if_triggered)?,
        Command::Learn {
            content,
            title,
            category,
            tags,
        } => cli::remember::learn(&config, title.as_deref(), &content, category.as_deref(), tags)?,
        Command::Recall { query, store, k } => cli::search::recall(&config, store, &query, k)?,
        Command::Stats { store } => cli::stats::stats(&config, store)?,
        Command::Evict { store } => cli::maintenance::evict(&config, store)?,
        Command::Export { store } => cli::export::export(&config, store)?,
        Command::Import { file, store } => cli::import::import(&config, store, &file)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset { store } => cli::reset::reset(&config, store)?,
    }

    Ok(())
}
