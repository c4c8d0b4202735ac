//! govgraph — grounded benefits assistant over a knowledge graph
//!
//! Usage:
//!   govgraph chat                → interactive benefits Q&A
//!   govgraph graph -o out.html   → render the relationship graph
//!   govgraph queries             → list stored query templates
//!   govgraph search <term>       → fuzzy full-text lookup

use clap::{Parser, Subcommand};
use govgraph_agent::{AgentConfig, BenefitAgent, InvocationLog, PassthroughGuard};
use govgraph_core::{ConversationHistory, GovGraphConfig};
use govgraph_kg::{ensure_fulltext_indexes, render_html, GraphBuilder, TemplateRegistry};
use govgraph_llm::{GroqProvider, LlmProvider};
use govgraph_store::{GraphStore, Neo4jStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser)]
#[command(
    name = "govgraph",
    version = env!("CARGO_PKG_VERSION"),
    about = "Grounded question answering and graph completion over a benefits knowledge graph"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat about benefit programs
    Chat,

    /// Build the relationship graph, completing gaps, and render it to HTML
    Graph {
        /// Output path for the HTML artifact
        #[arg(short, long, default_value = "knowledge_graph_visualization.html")]
        output: PathBuf,
    },

    /// List the query templates stored in the graph
    Queries,

    /// Fuzzy full-text lookup against a graph index
    Search {
        term: String,

        /// Full-text index to query
        #[arg(short, long, default_value = "child_benefit_topic")]
        index: String,
    },
}

fn init_tracing(log_file: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "govgraph=info".into());

    match log_file {
        Some(path) => {
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file = path.file_name().map(PathBuf::from).unwrap_or_else(|| "govgraph.log".into());
            let appender = tracing_appender::rolling::never(dir, file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_file.as_deref());

    let config = GovGraphConfig::from_env();
    let store: Arc<dyn GraphStore> = Arc::new(
        Neo4jStore::connect(
            &config.neo4j_uri,
            &config.neo4j_username,
            &config.neo4j_password,
            config.request_timeout(),
        )
        .await?,
    );

    match cli.command {
        Commands::Chat => chat(&config, store).await,
        Commands::Graph { output } => graph(&config, store, &output).await,
        Commands::Queries => queries(store).await,
        Commands::Search { term, index } => search(store, &index, &term).await,
    }
}

fn provider(config: &GovGraphConfig) -> Arc<dyn LlmProvider> {
    Arc::new(
        GroqProvider::new(config.groq_api_key.clone())
            .with_model(config.model.clone())
            .with_timeout(config.request_timeout()),
    )
}

async fn chat(config: &GovGraphConfig, store: Arc<dyn GraphStore>) -> anyhow::Result<()> {
    if let Err(e) = ensure_fulltext_indexes(&store).await {
        warn!("full-text index bootstrap failed: {}", e);
    }

    let agent = BenefitAgent::new(
        provider(config),
        store,
        Arc::new(PassthroughGuard),
        InvocationLog::new(),
        AgentConfig {
            model: config.model.clone(),
            ..Default::default()
        },
    );

    println!("Hello! I can help you with information about benefits. What would you like to know?");

    let mut history = ConversationHistory::new();
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        if utterance == "exit" || utterance == "quit" {
            break;
        }

        let reply = agent.answer(utterance, &history).await;
        match (reply.response, reply.error) {
            (Some(text), _) => {
                println!("{}", text);
                history.push_exchange(utterance, text);
            }
            (None, Some(error)) => println!("{}", error),
            (None, None) => {}
        }
    }

    Ok(())
}

async fn graph(
    config: &GovGraphConfig,
    store: Arc<dyn GraphStore>,
    output: &Path,
) -> anyhow::Result<()> {
    let builder = GraphBuilder::new(store, provider(config));
    let edges = builder.build().await;
    let path = render_html(&edges, output)?;
    println!("Knowledge graph HTML saved at: {}", path.display());
    Ok(())
}

async fn queries(store: Arc<dyn GraphStore>) -> anyhow::Result<()> {
    let registry = TemplateRegistry::new(store);
    let templates = registry.fetch_available().await?;
    if templates.is_empty() {
        println!("No queries available.");
        return Ok(());
    }
    for template in templates {
        println!("{}\n    {}", template.name, template.template);
    }
    Ok(())
}

async fn search(store: Arc<dyn GraphStore>, index: &str, term: &str) -> anyhow::Result<()> {
    let records = govgraph_kg::fulltext::search(&store, index, term).await?;
    if records.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for record in records {
        let name = record.get_string("name").unwrap_or_default();
        let score = record.get_string("score").unwrap_or_default();
        println!("{}  (score {})", name, score);
    }
    Ok(())
}
