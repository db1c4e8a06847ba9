use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docqa::config::Config;
use docqa::decoder::files::FileDecoder;
use docqa::mcp::server::{McpContext, McpServer};
use docqa::qa::QaService;
use docqa::retriever::Retriever;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docqa", version, about = "Ask questions over local text, PDF and CSV files")]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = "")]
    config: String,

    /// Override the data directory from the config
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the index and report what was loaded
    Index,
    /// Ask one question and print the ranked passages
    Ask {
        question: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the MCP tools over stdio
    Serve,
}

fn build_service(cli: &Cli) -> Result<QaService> {
    let mut config = Config::load(&cli.config)?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.to_string_lossy().to_string();
    }
    config.validate().context("invalid configuration")?;

    let data_dir = config.data_path();
    let retriever = Retriever::build(
        &data_dir,
        &config.ingest_options(),
        &config.vectorizer_params(),
        &FileDecoder::new(),
    );
    Ok(QaService::new(retriever, config.query_limits(), data_dir))
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the MCP transport; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let service = build_service(&cli)?;

    match cli.command {
        Command::Index => {
            let retriever = service.retriever();
            println!(
                "indexed {} chunks ({} terms)",
                retriever.chunk_count(),
                retriever.vocabulary_len()
            );
            for failure in retriever.failures() {
                println!("skipped {}: {}", failure.path.display(), failure.error);
            }
        }
        Command::Ask {
            question,
            top_k,
            json,
        } => {
            let resp = service.ask(&question, top_k)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&resp)?);
            } else {
                for (rank, p) in resp.answers.iter().enumerate() {
                    println!("{}. [{:.6}] {} ({})", rank + 1, p.score, p.doc_id, p.source_path);
                    println!("   {}\n", p.text);
                }
            }
        }
        Command::Serve => {
            info!("Starting docqa MCP server...");
            let ctx = McpContext {
                service: Arc::new(service),
            };
            McpServer::new(ctx).start().await?;
        }
    }

    Ok(())
}
