//! doc-harvest main entry point
//!
//! This is the command-line interface for the doc-harvest document harvester.

use anyhow::Context;
use clap::Parser;
use doc_harvest::config::{load_config_with_hash, Config};
use doc_harvest::crawler::{download_documents, fetch_pages, harvest};
use doc_harvest::url::PageUrlTemplate;
use doc_harvest::PaginationPlan;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Number of page URLs printed by --dry-run
const DRY_RUN_PREVIEW: u64 = 3;

/// doc-harvest: paginated search scraping and resumable document downloads
///
/// doc-harvest fetches every result page of a paginated search under a
/// concurrency cap, aggregates the markup into one file, then downloads each
/// linked document once, recording it in a ledger so interrupted runs resume.
#[derive(Parser, Debug)]
#[command(name = "doc-harvest")]
#[command(version)]
#[command(about = "Paginated search scraping and resumable document downloads", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Truncate the aggregated content file before fetching pages
    #[arg(long, conflicts_with_all = ["downloads_only", "dry_run"])]
    fresh: bool,

    /// Only fetch result pages
    #[arg(long, conflicts_with_all = ["downloads_only", "dry_run"])]
    pages_only: bool,

    /// Only download documents from the existing aggregated content
    #[arg(long, conflicts_with_all = ["pages_only", "dry_run"])]
    downloads_only: bool,

    /// Validate config and show the page plan without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    if cli.pages_only {
        fetch_pages(&config, cli.fresh)
            .await
            .context("Page fetching failed")?;
    } else if cli.downloads_only {
        download_documents(&config)
            .await
            .context("Document download failed")?;
    } else {
        harvest(&config, cli.fresh).await.context("Harvest failed")?;
    }

    tracing::info!("Harvest finished");
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvest=info,warn"),
            1 => EnvFilter::new("doc_harvest=debug,info"),
            2 => EnvFilter::new("doc_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the page plan
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let plan = PaginationPlan::from_config(&config.pagination)?;
    let template = PageUrlTemplate::from_config(&config.search);

    println!("=== doc-harvest Dry Run ===\n");

    println!("Search:");
    println!("  Base URL: {}", config.search.base_url);
    println!("  Offset parameter: {}", config.search.offset_param);
    for param in &config.search.query {
        println!("  {} = {}", param.name, param.value);
    }

    println!("\nPagination:");
    println!("  Total items: {}", config.pagination.total_items);
    println!("  Page size: {}", plan.page_size());
    println!("  Pages: {}", plan.total_pages());
    println!("  Concurrency limit: {}", config.pagination.concurrency_limit);

    println!("\nFetcher:");
    println!("  Strategy: {:?}", config.fetcher.strategy);
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Per-request timeout: {}s", config.fetcher.per_request_timeout);

    println!("\nExtraction:");
    println!("  Strategy: {:?}", config.extract.strategy);
    println!("  Marker class: {}", config.extract.marker_class);
    println!("  Extension: .{}", config.extract.extension);

    println!("\nOutput:");
    println!("  Aggregated content: {}", config.output.output_path);
    println!("  Download directory: {}", config.output.download_dir);
    println!(
        "  Ledger: {} ({:?} match)",
        config.output.ledger_path, config.output.ledger_match
    );

    println!("\nFirst page URLs:");
    for request in plan.requests().take(DRY_RUN_PREVIEW as usize) {
        println!("  {}", template.url_for(request.offset));
    }
    if plan.total_pages() > DRY_RUN_PREVIEW {
        println!("  ... {} more", plan.total_pages() - DRY_RUN_PREVIEW);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
