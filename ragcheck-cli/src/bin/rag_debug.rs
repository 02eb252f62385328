//! rag-debug: diagnose a RAG chatbot deployment without changing it.
//!
//! Stops with a "content processing needed" verdict when the vector database
//! is empty instead of running ingestion.

use clap::Parser;
use ragcheck_core::Variant;

/// Diagnose a RAG chatbot deployment: settings, book site, API, collections, sample query
#[derive(Parser, Debug)]
#[command(name = "rag-debug", version, about, long_about = None)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _cli = Cli::parse();
    let code = ragcheck::run::run_variant(Variant::Inspect).await?;
    std::process::exit(code);
}
