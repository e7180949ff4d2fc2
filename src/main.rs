use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_millionaire::data::{FallbackPool, load_questions_from_json};
use rust_millionaire::trivia::{
    FileStore, HttpTriviaSource, OfflineSource, QuestionCache, QuestionProvider, SystemClock,
    TriviaSource,
};
use rust_millionaire::{AppConfig, Millionaire};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file replacing the bundled fallback questions
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// File backing the question cache and request throttle
    #[arg(long)]
    store: Option<PathBuf>,

    /// Where to write logs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Seed for shuffles and lifelines
    #[arg(long)]
    seed: Option<u64>,

    /// Never fetch live questions
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let loaded = AppConfig::load();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| loaded.config.log_path.clone());
    init_tracing(&log_path)?;
    loaded.log();
    let config = loaded.config;
    info!(
        log = %log_path.display(),
        api_url = %config.api_url,
        offline = args.offline,
        "starting rust-millionaire"
    );

    let pool = Arc::new(match &args.questions {
        Some(path) => {
            let questions = load_questions_from_json(path)
                .with_context(|| format!("loading questions from {}", path.display()))?;
            FallbackPool::new(questions)
                .with_context(|| format!("{} cannot serve a full game", path.display()))?
        }
        None => FallbackPool::builtin().context("bundled question pool is invalid")?,
    });

    let store_path = args.store.unwrap_or(config.store_path);
    let cache = QuestionCache::new(Box::new(FileStore::open(&store_path)), Arc::new(SystemClock));

    let source: Box<dyn TriviaSource> = if args.offline {
        info!("offline mode; live questions disabled");
        Box::new(OfflineSource)
    } else {
        Box::new(
            HttpTriviaSource::new(&config.api_url, config.request_timeout)
                .context("building the trivia API client")?,
        )
    };

    let (min, max) = config.prefetch_jitter;
    let provider = QuestionProvider::new(cache, source, Arc::clone(&pool), rng(args.seed, 0))
        .with_prefetch_jitter(min, max);

    Millionaire::new(provider, pool, rng(args.seed, 1))
        .run()
        .await
        .context("running the game")?;

    info!("goodbye");
    Ok(())
}

fn rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream)),
        None => StdRng::from_os_rng(),
    }
}

/// Log to a file; the terminal belongs to the game.
fn init_tracing(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}
