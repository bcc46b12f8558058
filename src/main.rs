mod commands;
#[cfg(feature = "mcp")]
mod mcp;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::Workspace;

#[derive(Parser)]
#[command(name = "kairo")]
#[command(about = "Ask questions about your journal with mood-aware semantic search", long_about = None)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Journal database (overrides config)")]
    db: Option<PathBuf>,
    #[arg(short, long, global = true, help = "Debug logging on stderr")]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the retrieval index from the journal
    Index {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Ask a question about your journal
    Ask {
        question: String,
        #[arg(long, short, help = "Owner (user) id asking the question")]
        owner: i64,
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Show index status
    Status {
        #[arg(long, help = "JSON output")]
        json: bool,
    },
    /// Load the demo journal
    Seed {
        #[arg(long, short, default_value_t = 1, help = "Owner (user) id to seed")]
        owner: i64,
        #[arg(long, help = "JSON output")]
        json: bool,
    },

    // ===== MCP Server =====
    /// Start MCP server over stdio
    #[cfg(feature = "mcp")]
    Mcp,
}

fn init_tracing(verbose: bool) {
    // stdout carries command output and the MCP transport
    let _ = tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let workspace = Workspace::load(cli.db)?;

    match cli.command {
        Commands::Index { json } => commands::index::run(&workspace, json),
        Commands::Ask {
            question,
            owner,
            json,
        } => commands::ask::run(&workspace, &question, owner, json),
        Commands::Status { json } => commands::status::run(&workspace, json),
        Commands::Seed { owner, json } => commands::seed::run(&workspace, owner, json),

        #[cfg(feature = "mcp")]
        Commands::Mcp => run_mcp_server(&workspace),
    }
}

#[cfg(feature = "mcp")]
fn run_mcp_server(workspace: &Workspace) -> anyhow::Result<()> {
    let engine = std::sync::Arc::new(workspace.engine()?);
    let generation = engine.on_startup();
    tracing::info!(generation, db = %workspace.db_path.display(), "index ready");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(mcp::run_mcp_server(engine))
}
