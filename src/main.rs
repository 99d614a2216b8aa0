//! Memloom - Knowledge-graph memory agent for a single user
//!
//! CLI entry point: ingest statements, query the graph, run synthesis, or
//! walk through the full demo flow.

use anyhow::Result;
use clap::{Parser, Subcommand};
use memloom::{
    config::MemloomConfig,
    graph::GraphStore,
    llm::{gemini::GeminiClient, LanguageModel},
    memory::{MemoryEncoder, MemoryRetriever, MemorySynthesizer, MemoryWeaver},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "memloom")]
#[command(version)]
#[command(about = "Knowledge-graph memory agent for a single user")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MEMLOOM_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full demonstration: ingest, synthesize, retrieve
    Demo,

    /// Encode a statement and weave it into the graph
    Remember {
        /// The statement to remember
        statement: String,
    },

    /// Retrieve memories matching a query
    Recall {
        /// Free-text query
        query: String,
    },

    /// Scan the graph for patterns and derive one insight
    Synthesize,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("memloom={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MemloomConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Demo => run_demo(&config).await?,
        Commands::Remember { statement } => remember(&config, &statement).await?,
        Commands::Recall { query } => recall(&config, &query).await?,
        Commands::Synthesize => synthesize(&config).await?,
        Commands::Config { default } => {
            let config = if default { MemloomConfig::default() } else { config };
            show_config(&config)?;
        }
    }

    Ok(())
}

/// Resolve the API credential and build the production model client.
///
/// A missing credential aborts here, before any component is constructed.
fn build_model(config: &MemloomConfig) -> Result<Arc<dyn LanguageModel>> {
    let api_key = config.model.resolve_api_key()?;
    Ok(Arc::new(GeminiClient::new(&config.model, api_key)))
}

async fn open_store(config: &MemloomConfig) -> Arc<GraphStore> {
    Arc::new(GraphStore::open(config.storage.graph_path.clone(), config.user.id.clone()).await)
}

async fn run_demo(config: &MemloomConfig) -> Result<()> {
    println!("--- Memloom: Full Demo ---");

    let model = build_model(config)?;
    let store = open_store(config).await;
    let encoder = MemoryEncoder::new(model.clone());
    let weaver = MemoryWeaver::new(store.clone());
    let retriever = MemoryRetriever::new(store.clone());
    let synthesizer = MemorySynthesizer::new(store.clone(), model);

    // Ingestion phase
    let statements = [
        "I use Shram and Magnet as productivity tools.",
        "My favorite color is blue.",
        "I am a project manager at a tech company.",
    ];

    for statement in statements {
        println!("\nProcessing statement: '{statement}'");
        match encoder.encode(statement).await {
            Some(record) => weaver.weave(&record).await?,
            None => println!("Could not encode statement, skipping."),
        }
    }

    println!("\n--- Ingestion Complete. Current Graph State ---");
    let summary = store.summary().await;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    // Synthesis phase
    match synthesizer.synthesize().await? {
        Some(record) => println!("\nGenerated insight: {}", record.source_text),
        None => println!("\nNo new insights were generated."),
    }

    // Retrieval phase
    let query = "What do you know about my productivity tools?";
    println!("\n--- User Query: '{query}' ---");

    let memories = retriever.retrieve(query).await;
    if memories.is_empty() {
        println!("No relevant memories found for the query.");
        return Ok(());
    }

    println!("\n[1] Retrieved relevant memories:");
    for memory in &memories {
        println!("- {memory}");
    }

    // This context would be passed onward to answer the question
    let context = memories.join(". ");
    println!("\n[2] Context-rich prompt for the answering model:");
    println!("Based on this context: '{context}'. Answer the user's question: '{query}'");

    Ok(())
}

async fn remember(config: &MemloomConfig, statement: &str) -> Result<()> {
    let model = build_model(config)?;
    let store = open_store(config).await;
    let encoder = MemoryEncoder::new(model);
    let weaver = MemoryWeaver::new(store);

    match encoder.encode(statement).await {
        Some(record) => {
            weaver.weave(&record).await?;
            println!("Remembered: {statement}");
        }
        None => println!("Could not encode statement, nothing stored."),
    }

    Ok(())
}

async fn recall(config: &MemloomConfig, query: &str) -> Result<()> {
    // The credential is required at startup even though retrieval itself
    // never consults the model
    build_model(config)?;
    let store = open_store(config).await;
    let retriever = MemoryRetriever::new(store);

    let memories = retriever.retrieve(query).await;
    if memories.is_empty() {
        println!("No relevant memories found.");
    } else {
        for memory in memories {
            println!("- {memory}");
        }
    }

    Ok(())
}

async fn synthesize(config: &MemloomConfig) -> Result<()> {
    let model = build_model(config)?;
    let store = open_store(config).await;
    let synthesizer = MemorySynthesizer::new(store, model);

    match synthesizer.synthesize().await? {
        Some(record) => println!("Generated insight: {}", record.source_text),
        None => println!("No new insights were generated."),
    }

    Ok(())
}

fn show_config(config: &MemloomConfig) -> Result<()> {
    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");
    Ok(())
}
