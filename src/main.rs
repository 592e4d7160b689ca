use anyhow::Result;
use clap::Parser;
use colored::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use straq_core::{AnswerStyle, QueryContext, SearchBackend};
use straq_engine::QueryEngine;
use straq_llm::GenerativeClient;
use straq_search::{BackendKind, ManagedIndexBackend, SearchConfig, VectorIndexBackend};

#[derive(Parser)]
#[command(name = "straq")]
#[command(about = "Grounded Q&A over tenant-scoped strata documents", long_about = None)]
struct Cli {
    /// Question to answer
    question: String,

    /// Tenant whose document corpus is searched
    #[arg(short, long)]
    tenant: String,

    /// Maximum number of documents to retrieve
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Answer style: professional, simple or detailed
    #[arg(long, default_value = "professional")]
    style: String,

    /// Search backend override: managed or vector
    #[arg(long)]
    backend: Option<String>,

    /// Print the raw JSON result only
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut search_config = SearchConfig::from_env()?;
    if let Some(name) = &cli.backend {
        search_config.backend = BackendKind::from_name(name)?;
    }

    let search: Arc<dyn SearchBackend> = match search_config.backend {
        BackendKind::Managed => Arc::new(ManagedIndexBackend::new(search_config)?),
        BackendKind::Vector => Arc::new(VectorIndexBackend::new(search_config)?),
    };

    let generator = Arc::new(GenerativeClient::from_env()?);
    let engine = QueryEngine::new(search, generator);

    let context = QueryContext::new(cli.question, cli.tenant)
        .with_max_results(cli.max_results)
        .with_style(AnswerStyle::from_name(&cli.style));

    let result = engine.answer(context).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", result.answer.bold());
    println!();

    if result.citations.is_empty() {
        println!(
            "{}",
            format!("No citations ({} documents retrieved)", result.total_sources).dimmed()
        );
    } else {
        println!(
            "{}",
            format!(
                "Cited {} of {} retrieved documents:",
                result.cited_sources, result.total_sources
            )
            .dimmed()
        );
        for citation in &result.citations {
            println!(
                "  {} {} (p.{}, confidence {:.0}%)",
                "•".green(),
                citation.title,
                citation.page,
                citation.confidence * 100.0
            );
            if let Some(uri) = &citation.source_uri {
                println!("    {}", uri.dimmed());
            }
        }
    }

    println!(
        "{}",
        format!("Answered in {} ms", result.processing_time_ms).dimmed()
    );

    Ok(())
}
