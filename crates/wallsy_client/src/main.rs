// SPDX-License-Identifier: Apache-2.0

mod aggregator;
mod assets;
mod config;
mod error;
mod fetch;
mod merge;
mod models;

use aggregator::ImageSearchAggregator;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, builder::PossibleValuesParser};
use config::{ClientConfig, DeliveryMode, FailurePolicy};
use merge::RecordBook;
use models::record::RecordDelivery;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Quick-search presets offered next to the search box.
const CATEGORIES: [&str; 7] = ["Earth", "Space", "Mars", "NASA", "Galaxy", "Jupiter", "Asteroid"];

#[derive(Parser)]
#[command(name = "wallsy", about = "Search the space imagery catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog and resolve full-resolution image addresses.
    Search(SearchArgs),
    /// List the preset search categories.
    Categories,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Free-text search term (e.g., "Olympus Mons")
    #[arg(long, required_unless_present = "category", conflicts_with = "category")]
    term: Option<String>,

    /// Search one of the preset categories instead of a free-text term
    #[arg(long, value_parser = PossibleValuesParser::new(CATEGORIES))]
    category: Option<String>,

    /// How items are resolved; defaults to WALLSY_MODE or sequential
    #[arg(long, value_enum)]
    mode: Option<DeliveryMode>,

    /// Manifest lookups in flight in progressive mode (0 = no cap)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Maximum number of catalog items to resolve (at most 20)
    #[arg(long)]
    max_items: Option<usize>,

    /// Pause before each manifest lookup in sequential mode, in milliseconds
    #[arg(long)]
    throttle_ms: Option<u64>,

    /// Report items that could not be resolved
    #[arg(long, default_value_t = false)]
    collect_failures: bool,

    /// Print every delivery as a JSON line as it arrives
    #[arg(long, default_value_t = false)]
    stream: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "wallsy_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => handle_commands_search(args).await?,
        Commands::Categories => {
            for category in CATEGORIES {
                println!("{}", category);
            }
        }
    }

    Ok(())
}

async fn handle_commands_search(args: SearchArgs) -> Result<()> {
    let term = search_term(&args)?;
    let config = apply_overrides(ClientConfig::from_env(), &args);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, cancelling search");
                cancel.cancel();
            }
        });
    }

    let aggregator = ImageSearchAggregator::new(config)
        .context("Failed to set up image search")?
        .with_cancellation(cancel);

    let (tx, mut rx) = mpsc::unbounded_channel::<RecordDelivery>();
    let search = async {
        let sink = move |delivery: RecordDelivery| {
            if let Err(e) = tx.send(delivery) {
                tracing::warn!(id = e.0.id(), "Record collector stopped, dropping delivery");
            }
        };
        aggregator.search(&term, &sink).await
    };
    let collect = async {
        let mut book = RecordBook::default();
        while let Some(delivery) = rx.recv().await {
            if args.stream {
                match serde_json::to_string(&delivery) {
                    Ok(line) => println!("{}", line),
                    Err(e) => tracing::warn!(error = %e, "Failed to serialize delivery"),
                }
            }
            let id = delivery.id().to_string();
            let resolved = delivery.is_resolved();
            if book.apply(delivery) {
                tracing::debug!(id = %id, resolved, "Record merged");
            }
        }
        book
    };

    let (report, book) = tokio::join!(search, collect);
    let report = report.with_context(|| format!("Search for '{}' failed", term))?;

    let json_output = serde_json::to_string_pretty(&book.records())
        .context("Failed to serialize results to JSON")?;
    println!("{}", json_output);

    if book.is_empty() {
        eprintln!("No images found for '{}'.", term);
    } else {
        tracing::info!(records = book.len(), "Collected records");
    }
    if report.cancelled {
        eprintln!("Search was cancelled; results are partial.");
    }
    let unresolved = book.unresolved();
    if !unresolved.is_empty() {
        eprintln!("Records without a full-resolution image: {}", unresolved.join(", "));
    }
    if !report.failures.is_empty() {
        eprintln!("Items that could not be resolved:");
        for failure in &report.failures {
            eprintln!("  - {}: {}", failure.item, failure.reason);
        }
    }

    Ok(())
}

/// The trimmed search term. Blank terms never reach the aggregator.
fn search_term(args: &SearchArgs) -> Result<String> {
    let raw = args
        .term
        .as_deref()
        .or(args.category.as_deref())
        .unwrap_or_default();
    let term = raw.trim();
    if term.is_empty() {
        bail!("Search term must not be empty");
    }
    Ok(term.to_string())
}

fn apply_overrides(mut config: ClientConfig, args: &SearchArgs) -> ClientConfig {
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(max_items) = args.max_items {
        config.max_items = max_items;
    }
    if let Some(throttle_ms) = args.throttle_ms {
        config.throttle = std::time::Duration::from_millis(throttle_ms);
    }
    if args.collect_failures {
        config.failure_policy = FailurePolicy::Collect;
    }
    config
}
