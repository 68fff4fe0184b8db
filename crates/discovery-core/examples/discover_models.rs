//! Run the filter → search → sort pipeline over a model catalog.
//!
//! ```text
//! cargo run --example discover_models -- --query llama --sort parameters --desc
//! cargo run --example discover_models -- --catalog models.json --provider openai --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use discovery_core::config::SearchDefaults;
use discovery_core::{
    DiscoveryEngine, DiscoveryQuery, FilterCriteria, ModelRecord, SortCriterion, SortDirection,
    ValueSet,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "discover_models")]
#[command(about = "Filter, search and sort a model catalog")]
struct Args {
    /// JSON file holding an array of model records (built-in sample if omitted)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Free-text query
    #[arg(short, long)]
    query: Option<String>,

    /// Restrict to these providers
    #[arg(short, long)]
    provider: Vec<String>,

    /// Field to sort by
    #[arg(short, long)]
    sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Results per page
    #[arg(long, default_value = "10")]
    page_size: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let records = match &args.catalog {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            serde_json::from_str::<Vec<ModelRecord>>(&raw)
                .with_context(|| format!("Failed to parse catalog {}", path.display()))?
        }
        None => sample_catalog()?,
    };
    info!("Loaded {} models", records.len());

    let engine = DiscoveryEngine::new();
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    let query = DiscoveryQuery {
        criteria: FilterCriteria {
            providers: (!args.provider.is_empty()).then(|| ValueSet::of(&args.provider)),
            ..Default::default()
        },
        query: args.query.clone(),
        sort: args
            .sort
            .iter()
            .map(|field| SortCriterion::new(field.as_str(), direction, 0))
            .collect(),
        page_size: args.page_size,
        ..Default::default()
    };

    let page = engine.discover(&records, &query)?;
    info!("{} matches", page.total);
    for item in &page.items {
        let record = item.record;
        let highlighted = match &args.query {
            Some(q) => engine.search().highlight_matches(&record.name, q),
            None => record.name.clone(),
        };
        match item.score {
            Some(score) => println!("{:>5.2}  {:<32} {}", score, highlighted, record.provider),
            None => println!("       {:<32} {}", highlighted, record.provider),
        }
    }

    if let Some(q) = &args.query {
        let suggestions = engine
            .search()
            .suggestions(&records, q, SearchDefaults::SUGGESTION_LIMIT);
        if !suggestions.is_empty() {
            let texts: Vec<&str> = suggestions.iter().map(|s| s.text.as_str()).collect();
            println!("\nDid you mean: {}", texts.join(", "));
        }
    }

    for stats in engine.cache_stats() {
        info!(
            "{} cache: {} hits, {} misses",
            stats.name, stats.hits, stats.misses
        );
    }

    Ok(())
}

fn sample_catalog() -> Result<Vec<ModelRecord>> {
    let value = json!([
        {
            "id": "gpt-4o", "name": "GPT-4o", "provider": "OpenAI", "category": "chat",
            "description": "Flagship multimodal model",
            "pricing": { "input": 5.0, "output": 15.0 },
            "contextWindow": 128000,
            "capabilities": { "streaming": true, "functionCalling": true, "vision": true },
            "metrics": { "accuracy": 94.0, "popularity": 99.0 },
            "releaseDate": "2024-05-13"
        },
        {
            "id": "claude-3-5-sonnet", "name": "Claude 3.5 Sonnet", "provider": "Anthropic",
            "category": "chat", "description": "Fast, capable assistant model",
            "pricing": { "input": 3.0, "output": 15.0 },
            "contextWindow": 200000,
            "capabilities": { "streaming": true, "functionCalling": true, "vision": true },
            "metrics": { "accuracy": 93.0 },
            "releaseDate": "2024-06-20"
        },
        {
            "id": "llama-3-70b", "name": "Llama 3 70B", "provider": "Meta",
            "category": "text-generation", "description": "Open weights instruction model",
            "parameters": 70.0, "contextWindow": 8192,
            "releaseDate": "2024-04-18"
        },
        {
            "id": "llama-3-8b", "name": "Llama 3 8B", "provider": "Meta",
            "category": "text-generation", "description": "Small open weights model",
            "parameters": 8.0, "contextWindow": 8192,
            "releaseDate": "2024-04-18"
        },
        {
            "id": "codestral", "name": "Codestral", "provider": "Mistral", "category": "code",
            "description": "Code generation model", "parameters": 22.0,
            "available": false
        }
    ]);
    Ok(serde_json::from_value(value)?)
}
