//! Namebridge CLI Entry Point
//!
//! Thin front-end over namebridge-core: recommend Korean names for an
//! English name (hash or embedding strategy) and manage the saved-name
//! history store.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use namebridge_core::{
    find_model_path, DualEncoder, EmbeddingEngine, HashRecommender, HistoryRecord, HistoryStore,
    Recommendation, Recommender, RecommendError, RecommendStrategy, ReferenceRow, Result,
};

#[derive(Parser)]
#[command(name = "namebridge")]
#[command(about = "Korean name recommendations for English names")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recommend Korean name candidates for an English name
    Recommend {
        /// English given name to convert
        #[arg(long, short)]
        name: String,

        /// Number of candidates to return
        #[arg(long, short, default_value_t = 3)]
        k: usize,

        /// Recommendation strategy
        #[arg(long, value_enum, default_value_t = Strategy::Hash)]
        strategy: Strategy,

        /// Dual-encoder model artifact (embedding strategy)
        #[arg(long)]
        model: Option<PathBuf>,

        /// JSON file with reference rows (embedding strategy)
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// Manage the saved-name history
    History {
        /// History database directory
        #[arg(long)]
        db: Option<PathBuf>,

        #[command(subcommand)]
        command: HistoryCommand,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Deterministic hash-seeded placeholder
    Hash,
    /// Dual-encoder similarity lookup
    Embedding,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// Save a chosen name pair
    Save {
        #[arg(long)]
        english: String,
        #[arg(long)]
        korean: String,
        #[arg(long)]
        user: Option<String>,
    },
    /// List saved names, newest first
    List {
        #[arg(long)]
        user: Option<String>,
        #[arg(long, default_value_t = namebridge_core::DEFAULT_LIST_LIMIT)]
        limit: usize,
    },
    /// Delete a saved name by id
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long)]
        user: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "namebridge=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(args).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Recommend {
            name,
            k,
            strategy,
            model,
            reference,
        } => {
            let results = match strategy {
                Strategy::Hash => HashRecommender::new().recommend(&name, k)?,
                Strategy::Embedding => {
                    let recommender = build_recommender(model.as_deref(), reference.as_deref())?;
                    recommender.recommend(&name, k)?
                }
            };
            print_recommendations(results)?;
        }

        Command::History { db, command } => {
            let store = HistoryStore::open(history_db_path(db))?;
            match command {
                HistoryCommand::Save {
                    english,
                    korean,
                    user,
                } => {
                    let record = HistoryRecord::new(user, english, korean);
                    let id = store.save(record.clone()).await?;
                    tracing::info!("Saved {} -> {} as {}", record.english_name, record.korean_name, id);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                }
                HistoryCommand::List { user, limit } => {
                    let records = store.list(user.as_deref(), limit);
                    println!("{}", serde_json::to_string_pretty(&records)?);
                }
                HistoryCommand::Delete { id, user } => {
                    let id = Uuid::parse_str(&id)?;
                    store.delete(&id, user.as_deref())?;
                    tracing::info!("Deleted {}", id);
                }
            }
        }
    }

    Ok(())
}

/// Wire up the embedding strategy: load the model, read the reference rows,
/// build the cache.
fn build_recommender(
    model: Option<&std::path::Path>,
    reference: Option<&std::path::Path>,
) -> Result<Recommender> {
    let reference = reference.ok_or_else(|| {
        RecommendError::invalid_input("--reference is required for the embedding strategy")
    })?;

    let model_path = find_model_path(model)?;
    let encoder = DualEncoder::from_path(&model_path)?;
    let engine = Arc::new(EmbeddingEngine::new(Arc::new(encoder)));

    let file = std::fs::File::open(reference)?;
    let rows: Vec<ReferenceRow> = serde_json::from_reader(std::io::BufReader::new(file))?;
    tracing::info!("Loaded {} reference rows from {}", rows.len(), reference.display());

    let recommender = Recommender::new(engine);
    recommender.build_cache(&rows)?;
    Ok(recommender)
}

/// Print recommendations as JSON, rounding scores to 2 decimals at this
/// display boundary.
fn print_recommendations(mut results: Vec<Recommendation>) -> Result<()> {
    for rec in results.iter_mut() {
        rec.trend_score = (rec.trend_score * 100.0).round() / 100.0;
    }
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn history_db_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        return PathBuf::from(home).join(".namebridge").join("history");
    }
    PathBuf::from("namebridge-history")
}
