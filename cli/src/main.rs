use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use search_cli::{build_server, resolve_config, ConfigOverrides};
use search_core::batch::process_queries;
use search_core::dedup::remove_duplicates;
use search_core::paginator::paginate;
use search_core::{DocumentStatus, ExecutionPolicy};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "search-cli")]
#[command(about = "Rank in-memory documents by TF-IDF relevance", long_about = None)]
struct Cli {
    #[command(flatten)]
    engine: EngineArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct EngineArgs {
    /// Input path (JSON/JSONL file or directory)
    #[arg(long, global = true, default_value = "./docs")]
    input: PathBuf,
    /// JSON engine config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Space-separated stop words (overrides the config file)
    #[arg(long, global = true)]
    stop_words: Option<String>,
    /// Accumulator shards for parallel ranking (overrides the config file)
    #[arg(long, global = true)]
    shards: Option<usize>,
    /// Use the parallel code paths
    #[arg(long, global = true, default_value_t = false)]
    parallel: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Actual,
    Irrelevant,
    Banned,
    Removed,
}

impl From<StatusArg> for DocumentStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Actual => DocumentStatus::Actual,
            StatusArg::Irrelevant => DocumentStatus::Irrelevant,
            StatusArg::Banned => DocumentStatus::Banned,
            StatusArg::Removed => DocumentStatus::Removed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the top documents for a query
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, value_enum, default_value_t = StatusArg::Actual)]
        status: StatusArg,
        /// Group hits into pages of this size
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print the query words matched by every document
    Match {
        #[arg(long)]
        query: String,
    },
    /// Remove documents whose term sets duplicate a lower id
    Dedup,
    /// Run one query per line of a file
    Batch {
        #[arg(long)]
        queries: PathBuf,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let config = resolve_config(&ConfigOverrides {
        config_file: cli.engine.config.clone(),
        stop_words: cli.engine.stop_words.clone(),
        shards: cli.engine.shards,
    })?;
    let mut server = build_server(&cli.engine.input, &config)?;
    let policy = if cli.engine.parallel { ExecutionPolicy::Parallel } else { ExecutionPolicy::Sequential };

    match cli.command {
        Commands::Search { query, status, page_size } => {
            let hits = server.find_top_documents_by_status_policy(policy, &query, status.into())?;
            match page_size {
                Some(size) => {
                    for (page_no, page) in paginate(&hits, size).into_iter().enumerate() {
                        println!("{}", json!({ "page": page_no + 1, "results": page }));
                    }
                }
                None => {
                    for hit in &hits {
                        println!("{}", serde_json::to_string(hit)?);
                    }
                }
            }
        }
        Commands::Match { query } => {
            for id in server.document_ids() {
                let (words, status) = server.match_document_policy(policy, &query, id)?;
                println!("{}", json!({ "document_id": id, "status": status, "words": words }));
            }
        }
        Commands::Dedup => {
            let removed = remove_duplicates(&mut server);
            tracing::info!(removed = removed.len(), remaining = server.document_count(), "dedup complete");
            println!("{}", json!({ "removed": removed, "remaining": server.document_ids() }));
        }
        Commands::Batch { queries } => {
            let text = fs::read_to_string(&queries)?;
            let queries: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            let results = process_queries(&server, &queries)?;
            for (query, hits) in queries.iter().zip(results) {
                println!("{}", json!({ "query": query, "results": hits }));
            }
        }
    }
    Ok(())
}
