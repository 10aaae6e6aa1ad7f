//! CLI entry point for the AltStore catalog scraper.

use anyhow::{Context, Result};
use clap::Parser;
use scraper_core::{
    CatalogDocument, DEFAULT_PAGE_SIZE, GitHubClient, ReleaseCache, RepoOutcome, RetryPolicy,
    SyncOptions, load_tracked_repositories, reconcile,
};
use tracing::{debug, error, info, warn};

mod cli;

use cli::Args;

const TOKEN_ENV: &str = "GITHUB_TOKEN";

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let entries = load_tracked_repositories(&args.scraping)
        .with_context(|| format!("loading scrape list {}", args.scraping.display()))?;
    let document = CatalogDocument::load(&args.catalog)
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    let cache = args
        .cache
        .as_deref()
        .map(ReleaseCache::load)
        .transpose()
        .context("loading release cache")?;

    let token = std::env::var(TOKEN_ENV).ok();
    if token.is_none() {
        debug!("{TOKEN_ENV} not set; using unauthenticated API access");
    }

    // --max-retries counts retries; the policy counts attempts
    let policy = RetryPolicy::with_max_attempts(u32::from(args.max_retries) + 1);
    let client = GitHubClient::with_base_urls(&args.api_url, &args.raw_url, token, policy)
        .context("building GitHub client")?;

    let options = SyncOptions {
        page_size: DEFAULT_PAGE_SIZE,
        max_pages: u32::from(args.max_pages),
        dedup: args.dedup.into(),
    };

    info!(
        repositories = entries.len(),
        apps = document.catalog.len(),
        cached = cache.is_some(),
        "Scraper starting"
    );

    let report = reconcile(&client, &entries, document.catalog, cache, &options).await;

    for entry in &report.outcomes {
        match &entry.outcome {
            RepoOutcome::Failed(_) => {
                warn!(repo = %entry.repo, outcome = %entry.outcome, "repository failed");
            }
            outcome => debug!(repo = %entry.repo, %outcome, "repository done"),
        }
    }
    let summary = report.summary();

    // Persist everything we can before reporting any failure
    let output = CatalogDocument {
        catalog: report.catalog,
        shape: document.shape,
    };
    let apps = output.catalog.len();
    let output_result = output
        .save(&args.output)
        .with_context(|| format!("writing catalog {}", args.output.display()));
    let cache_result = match (&args.cache, &report.cache) {
        (Some(path), Some(cache)) => cache
            .save(path)
            .with_context(|| format!("writing release cache {}", path.display())),
        _ => Ok(()),
    };

    if let Err(e) = &output_result {
        error!(error = %format!("{e:#}"), "catalog not saved");
    }
    if let Err(e) = &cache_result {
        error!(error = %format!("{e:#}"), "release cache not saved");
    }
    output_result?;
    cache_result?;

    info!(
        created = summary.created,
        updated = summary.updated,
        unchanged = summary.unchanged,
        skipped = summary.skipped,
        disabled = summary.disabled,
        failed = summary.failed,
        versions_added = summary.versions_added,
        apps,
        "Sync complete"
    );

    Ok(())
}
