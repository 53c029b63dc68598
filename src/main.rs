use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use workwise_match::config::{LoggingSettings, Settings};
use workwise_match::models::{
    BatchResponse, JobRecommendationsResponse, RecommendationWeights, ScoringWeights,
    WorkerMatchesResponse,
};
use workwise_match::services::{CachedStore, PostgresStore};
use workwise_match::{JobRecommender, MatchingEngine, WorkerMatcher};

type Engine = MatchingEngine<CachedStore<PostgresStore>>;

#[derive(Parser)]
#[command(name = "workwise-match")]
#[command(about = "Rank workers for jobs and jobs for workers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (default: config/default.toml + config/local.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Best matching workers for each job
    Workers {
        #[arg(required = true)]
        job_ids: Vec<i64>,
    },

    /// Recommended jobs for each worker
    Jobs {
        #[arg(required = true)]
        worker_ids: Vec<i64>,
    },
}

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if logging.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_engine(settings: &Settings) -> Result<Engine> {
    let db = &settings.database;
    let postgres = PostgresStore::from_settings(
        &db.url,
        db.max_connections,
        db.min_connections,
        db.acquire_timeout_secs,
        db.idle_timeout_secs,
    )
    .await
    .context("Failed to connect to PostgreSQL")?;

    postgres
        .health_check()
        .await
        .context("PostgreSQL health check failed")?;

    info!("PostgreSQL store initialized (max: {} connections)", db.max_connections.unwrap_or(10));

    let store = CachedStore::new(postgres, settings.cache.skills_capacity, settings.cache.skills_ttl_secs);

    info!(
        "Skills cache initialized ({} entries, TTL: {}s)",
        settings.cache.skills_capacity, settings.cache.skills_ttl_secs
    );

    let weights = ScoringWeights::from(&settings.scoring.weights);
    if (weights.sum() - 1.0).abs() > 1e-6 {
        tracing::warn!("Matching weights sum to {:.3}, not 1.0", weights.sum());
    }

    let matcher = WorkerMatcher::new(weights, settings.matching.worker_policy());
    let recommender = JobRecommender::new(
        RecommendationWeights::from(&settings.scoring.recommendation),
        settings.matching.job_policy(),
    );

    info!("Matcher initialized with weights: {:?}", weights);

    Ok(MatchingEngine::new(store, matcher, recommender))
}

/// Run one request per id concurrently, keeping the input order
///
/// Fails as a whole if any single request fails.
async fn run_batch<T, F, Fut>(ids: &[i64], request: F) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for (index, &id) in ids.iter().enumerate() {
        let fut = request(id);
        tasks.spawn(async move { (index, fut.await) });
    }

    let mut slots: Vec<Option<T>> = (0..ids.len()).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.context("Request task panicked")?;
        slots[index] = Some(result?);
    }

    slots
        .into_iter()
        .map(|slot| slot.context("Request produced no result"))
        .collect()
}

async fn run(cli: Cli, settings: Settings) -> Result<String> {
    let engine = Arc::new(build_engine(&settings).await?);

    let output = match cli.command {
        Commands::Workers { job_ids } => {
            let results = run_batch(&job_ids, |job_id| {
                let engine = Arc::clone(&engine);
                async move {
                    let matches = engine
                        .find_best_workers(job_id)
                        .await
                        .with_context(|| format!("Failed to match workers for job {}", job_id))?;
                    Ok::<_, anyhow::Error>(WorkerMatchesResponse::new(job_id, matches))
                }
            })
            .await?;

            serde_json::to_string_pretty(&BatchResponse::new(results))?
        }
        Commands::Jobs { worker_ids } => {
            let results = run_batch(&worker_ids, |worker_id| {
                let engine = Arc::clone(&engine);
                async move {
                    let recommendations = engine
                        .recommend_jobs(worker_id)
                        .await
                        .with_context(|| format!("Failed to recommend jobs for worker {}", worker_id))?;
                    Ok::<_, anyhow::Error>(JobRecommendationsResponse::new(worker_id, recommendations))
                }
            })
            .await?;

            serde_json::to_string_pretty(&BatchResponse::new(results))?
        }
    };

    info!("Skills cache holds {} entries", engine.store().stats().entries);

    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Failed to load configuration")?;

    init_tracing(&settings.logging);

    info!("Starting Workwise matching run...");

    match run(cli, settings).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!("Matching run failed: {:#}", e);
            Err(e)
        }
    }
}
