//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use scraper_core::github::{DEFAULT_API_BASE, DEFAULT_RAW_BASE};
use scraper_core::{DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES, DedupStrategy};

/// Sync an AltStore app catalog with GitHub releases.
///
/// Reads the tracked repositories from the scraping list, merges any new
/// installable releases into the existing catalog, and writes the result.
/// Set `GITHUB_TOKEN` for authenticated (higher rate limit) API access.
#[derive(Parser, Debug)]
#[command(name = "altstore-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Tracked repository list (JSON array)
    #[arg(short = 's', long, default_value = "scraping.json")]
    pub scraping: PathBuf,

    /// Existing catalog to merge into; a missing file starts empty
    #[arg(short = 'i', long, default_value = "my-apps.json")]
    pub catalog: PathBuf,

    /// Where the merged catalog is written
    #[arg(short = 'o', long, default_value = "altstore-repo.json")]
    pub output: PathBuf,

    /// Last-seen tag cache; enables early stop on known releases
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Page limit for deep-scan repositories (1-100)
    #[arg(
        short = 'p',
        long,
        default_value_t = DEFAULT_MAX_PAGES as u8,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub max_pages: u8,

    /// Maximum retry attempts for transient failures (0-10)
    #[arg(
        short = 'r',
        long,
        default_value_t = DEFAULT_MAX_RETRIES as u8,
        value_parser = clap::value_parser!(u8).range(0..=10)
    )]
    pub max_retries: u8,

    /// Fields that identify a version as already known
    #[arg(long, value_enum, default_value_t = DedupArg::VersionAndDate)]
    pub dedup: DedupArg,

    /// GitHub REST API base URL (GitHub Enterprise or a local mock)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_url: String,

    /// Base URL for raw repository files
    #[arg(long, default_value = DEFAULT_RAW_BASE)]
    pub raw_url: String,
}

/// `--dedup` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DedupArg {
    /// Version string only
    Version,
    /// Version string and publish date
    VersionAndDate,
}

impl From<DedupArg> for DedupStrategy {
    fn from(arg: DedupArg) -> Self {
        match arg {
            DedupArg::Version => Self::Version,
            DedupArg::VersionAndDate => Self::VersionAndDate,
        }
    }
}
