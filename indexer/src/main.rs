mod collection;
mod repl;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use wikirank_core::pagerank::MAX_ITERATIONS;
use wikirank_core::persist::{load_snapshot_lenient, save_snapshot, IndexPaths, MetaFile, FORMAT_VERSION};
use wikirank_core::{build_index, PageRankParams, Querier};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query a PageRank + TF-IDF index over a wiki dump", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a wiki XML dump, JSON/JSONL files, or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Give up on PageRank after this many iterations
        #[arg(long, default_value_t = MAX_ITERATIONS)]
        max_iterations: usize,
    },
    /// Interactive search over a built index
    Query {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// Weight relevance by PageRank authority
        #[arg(long, default_value_t = false)]
        pagerank: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, max_iterations } => build(&input, &output, max_iterations),
        Commands::Query { index, pagerank } => {
            let querier = Querier::new(load_snapshot_lenient(&IndexPaths::new(&index)));
            tracing::info!(num_docs = querier.index().num_docs(), pagerank, "index loaded");
            let stdin = io::stdin();
            repl::run(&querier, pagerank, stdin.lock(), &mut io::stdout())
        }
    }
}

fn build(input: &str, output: &str, max_iterations: usize) -> Result<()> {
    let docs = collection::read_collection(Path::new(input))?;
    tracing::info!(num_docs = docs.len(), input, "read document collection");

    let params = PageRankParams { max_iterations, ..Default::default() };
    let snapshot = build_index(&docs, &params).context("indexing failed, nothing written")?;

    let meta = MetaFile {
        num_docs: snapshot.num_docs() as u32,
        num_terms: snapshot.relevance.num_terms() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: FORMAT_VERSION,
    };
    save_snapshot(&IndexPaths::new(output), &snapshot, &meta)?;

    tracing::info!(output, "index build complete");
    Ok(())
}
