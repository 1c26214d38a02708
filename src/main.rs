//! CLI interface for the vector database

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oxvec::{Collection, CollectionSnapshot, DistanceMetric, SearchResult, Vector};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxvec")]
#[command(about = "An in-memory vector database with exact similarity search", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the vectors of a collection snapshot against a query
    Query {
        /// Collection snapshot (JSON)
        #[arg(short, long)]
        file: PathBuf,
        /// Query vector as comma-separated values (e.g., "1.0,0.0,0.0")
        query: String,
        /// Similarity metric
        #[arg(short, long, value_enum, default_value = "cosine")]
        metric: DistanceMetric,
        /// Number of results to return
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
    /// Show a collection snapshot's size, dimension and entries
    Inspect {
        /// Collection snapshot (JSON)
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Score two vectors against each other
    Score {
        /// First vector as comma-separated values
        a: String,
        /// Second vector as comma-separated values
        b: String,
        /// Similarity metric
        #[arg(short, long, value_enum, default_value = "cosine")]
        metric: DistanceMetric,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_collection(path: &Path) -> Result<Collection> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let snapshot = CollectionSnapshot::read_json(BufReader::new(file))
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let collection = Collection::from_snapshot(snapshot)?;
    tracing::info!(
        collection = collection.name(),
        vectors = collection.len(),
        "loaded snapshot"
    );
    Ok(collection)
}

/// Numbered result listing for `query`. An empty listing does not imply an empty
/// collection: entries the metric cannot score are left out.
fn render_results(metric: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found".to_string();
    }
    let mut out = format!("Top {} results ({}):", results.len(), metric);
    for (i, hit) in results.iter().enumerate() {
        out.push_str(&format!("\n{}. {} (score: {:.6})", i + 1, hit.entry.id(), hit.score));
    }
    out
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Query {
            file,
            query,
            metric,
            k,
        } => {
            let collection = load_collection(&file)?;
            let q: Vector = query.parse()?;
            let results = collection.query_with_scores(&q, metric.metric(), k)?;

            println!("{}", render_results(metric.metric().name(), &results));
        }
        Commands::Inspect { file } => {
            let collection = load_collection(&file)?;
            println!("Collection: {}", collection.name());
            match collection.dimension() {
                Some(dim) => println!("Dimension: {}", dim),
                None => println!("Dimension: (unset)"),
            }
            println!("Vectors ({} total):", collection.len());
            for entry in collection.entries() {
                println!("  - {} {:?}", entry.id(), entry.vector().as_slice());
            }
        }
        Commands::Score { a, b, metric } => {
            let a: Vector = a.parse()?;
            let b: Vector = b.parse()?;
            let score = metric.metric().score(a.as_slice(), b.as_slice())?;
            println!("{}: {}", metric.metric().name(), score);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxvec::CosineSimilarity;

    #[test]
    fn test_no_results_when_every_entry_is_excluded() {
        let mut collection = Collection::new("test");
        collection.add_vector("zero", [0.0, 0.0]).unwrap();
        let results = collection
            .query_with_scores([1.0, 0.0], &CosineSimilarity, 5)
            .unwrap();
        assert_eq!(render_results("cosine", &results), "No results found");
    }

    #[test]
    fn test_numbered_listing() {
        let mut collection = Collection::new("test");
        collection.add_vector("a", [1.0, 0.0]).unwrap();
        collection.add_vector("b", [0.0, 1.0]).unwrap();
        let results = collection
            .query_with_scores([1.0, 0.0], &CosineSimilarity, 5)
            .unwrap();
        assert_eq!(
            render_results("cosine", &results),
            "Top 2 results (cosine):\n1. a (score: 1.000000)\n2. b (score: 0.000000)"
        );
    }
}
