use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawl_engine::answer::match_answer;
use crawl_engine::api::{build_router, cors_layer, state::AppState};
use crawl_engine::config::AppConfig;
use crawl_engine::models::{CrawlRecord, StopDefinition};
use crawl_engine::parse_duration;
use crawl_engine::storage::{CrawlSource, JsonlStore, StorageConfig};
use crawl_engine::timing::{
    calculate_crawl_status, format_time_remaining, Clock, CrawlSnapshot, SystemClock,
};

#[derive(Parser)]
#[command(name = "crawl-engine")]
#[command(about = "Timing, reveal and answer checking for self-guided city crawls")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the lifecycle status of a crawl
    Status {
        /// Stored crawl id
        #[arg(long, conflicts_with = "start")]
        crawl: Option<String>,

        /// Ad-hoc start time, e.g. "18:00" or "2025-06-15 18:00"
        #[arg(long)]
        start: Option<String>,

        /// Ad-hoc duration label
        #[arg(long, default_value = "2 hours")]
        duration: String,

        /// Number of stops for an ad-hoc crawl
        #[arg(long, default_value_t = 4)]
        stops: u32,
    },

    /// Print per-stop windows and reveal state
    Timeline {
        #[arg(long)]
        crawl: String,
    },

    /// Re-evaluate a crawl on every tick until it completes
    Watch {
        #[arg(long)]
        crawl: String,

        /// Tick interval (e.g., "1s", "500ms"); defaults to engine.tick_interval
        #[arg(long)]
        interval: Option<String>,
    },

    /// Check a free-text answer against a canonical one
    CheckAnswer {
        #[arg(long)]
        answer: String,

        #[arg(long)]
        correct: String,
    },

    /// Render a second count as a countdown string
    Format { seconds: u64 },

    /// Import crawl definitions from a JSON array file
    Import { file: PathBuf },

    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Starting crawl-engine v{}", env!("CARGO_PKG_VERSION"));

    let store = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));
    let clock = SystemClock;

    match cli.command {
        Commands::Status {
            crawl,
            start,
            duration,
            stops,
        } => {
            let now = clock.now();
            let status = match crawl {
                Some(id) => {
                    let record = load_crawl(&store, &id)?;
                    println!("{}", record.name);
                    calculate_crawl_status(
                        record.schedule.start_time.as_deref(),
                        &record.schedule.duration,
                        &record.schedule.stops,
                        &now,
                    )
                }
                None => {
                    let stops: Vec<StopDefinition> = (1..=stops).map(StopDefinition::new).collect();
                    calculate_crawl_status(start.as_deref(), &duration, &stops, &now)
                }
            };

            println!("Status: {}", status);
            if let Some(index) = status.current_stop_index() {
                println!("Current stop: {}", index + 1);
            }
        }
        Commands::Timeline { crawl } => {
            let record = load_crawl(&store, &crawl)?;
            let snapshot = CrawlSnapshot::evaluate(&record, &clock.now());
            print_timeline(&snapshot);
        }
        Commands::Watch { crawl, interval } => {
            let tick = match interval {
                Some(text) => parse_duration(&text)
                    .filter(|d| !d.is_zero())
                    .with_context(|| format!("Invalid interval: {}", text))?,
                None => config
                    .engine
                    .tick_interval()
                    .context("Invalid engine.tick_interval")?,
            };
            let record = load_crawl(&store, &crawl)?;
            tracing::info!(crawl = %record.id, "Watching crawl (tick: {:?})", tick);

            let mut ticker = tokio::time::interval(tick);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let snapshot = CrawlSnapshot::evaluate(&record, &clock.now());
                        tracing::debug!(crawl = %record.id, status = snapshot.status.label(), "Tick");
                        print_tick(&snapshot);
                        if snapshot.status.is_completed() {
                            break;
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Interrupted");
                        break;
                    }
                }
            }
        }
        Commands::CheckAnswer { answer, correct } => {
            let synonyms = config.answers.synonym_table();
            match match_answer(&answer, &correct, &synonyms) {
                Some(how) => println!("correct ({:?})", how),
                None => println!("incorrect"),
            }
        }
        Commands::Format { seconds } => {
            println!("{}", format_time_remaining(seconds));
        }
        Commands::Import { file } => {
            let count = store
                .import_file(&file)
                .with_context(|| format!("Failed to import {:?}", file))?;
            println!("Imported {} crawls into {:?}", count, config.data_dir);
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let cors = cors_layer(&config.server.cors_origin)?;

            let store = Arc::new(store);
            let state = AppState {
                crawls: store.clone(),
                progress: store,
                synonyms: Arc::new(config.answers.synonym_table()),
                clock: Arc::new(clock),
            };
            let app = build_router(state).layer(cors);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn load_crawl(store: &JsonlStore, id: &str) -> Result<CrawlRecord> {
    match store.crawl(id)? {
        Some(record) => Ok(record),
        None => bail!("Crawl not found: {}", id),
    }
}

fn print_tick(snapshot: &CrawlSnapshot) {
    let next = snapshot
        .next_reveal()
        .and_then(|s| s.reveal.countdown.as_deref().map(|c| (s.stop_number, c)));
    match next {
        Some((stop, countdown)) => println!("{} | stop {} unlocks in {}", snapshot.status, stop, countdown),
        None => println!("{}", snapshot.status),
    }
}

fn print_timeline(snapshot: &CrawlSnapshot) {
    println!("=== {} ({}) ===", snapshot.name, snapshot.crawl_id);
    println!("Status: {}", snapshot.status);
    if let (Some(start), Some(end)) = (snapshot.start_time, snapshot.end_time) {
        println!(
            "Window: {} - {}",
            start.to_local().format("%Y-%m-%d %H:%M"),
            end.to_local().format("%Y-%m-%d %H:%M")
        );
    }
    if snapshot.public_mode {
        println!("Reveal-gated: yes");
    }
    println!();

    for stop in &snapshot.stops {
        let title = stop.title.as_deref().unwrap_or("");
        let window = match &stop.timing {
            Some(t) => {
                let marker = if t.is_active {
                    " <- now"
                } else if t.is_completed {
                    " (done)"
                } else {
                    ""
                };
                format!(
                    "{}-{} {:>3}m{}",
                    t.start_time.to_local().format("%H:%M"),
                    t.end_time.to_local().format("%H:%M"),
                    t.duration_minutes,
                    marker
                )
            }
            None => "unscheduled".to_string(),
        };
        let reveal = match (&stop.reveal.countdown, stop.reveal.available) {
            (Some(countdown), false) => format!(" [locked, {}]", countdown),
            (None, false) => " [locked]".to_string(),
            _ => String::new(),
        };
        println!(
            "  {:>2}. {:<8} {} {}{}",
            stop.stop_number,
            stop.kind.to_string(),
            window,
            title,
            reveal
        );
    }
}
