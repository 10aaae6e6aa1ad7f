//! AltStore Scraper Core Library
//!
//! Keeps an AltStore-style app catalog in sync with the GitHub releases of a
//! list of tracked repositories. A run fetches release listings, picks the
//! installable `.ipa` of each release, and merges anything new into the
//! catalog without ever rewriting what is already there.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`github`] - Release source trait, REST client, retry, pagination
//! - [`release`] - Artifact selection and release normalization
//! - [`catalog`] - Catalog records, merging, ordering, storage
//! - [`config`] - Tracked repository list
//! - [`cache`] - Last-seen tag per repository
//! - [`sync`] - The reconciliation driver tying it together
//! - [`persist`] - JSON load/save helpers

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod catalog;
pub mod config;
pub mod github;
pub mod persist;
pub mod release;
pub mod sync;
mod user_agent;

// Re-export commonly used types
pub use cache::ReleaseCache;
pub use catalog::{AppEntry, Catalog, CatalogDocument, DedupStrategy, VersionRecord};
pub use config::{ConfigError, RawTrackedRepository, TrackedRepository, load_tracked_repositories};
pub use github::{
    DEFAULT_MAX_PAGES, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, FetchError, GitHubClient,
    ReleaseSource, RetryPolicy,
};
pub use persist::StoreError;
pub use sync::{RepoOutcome, RepoReport, SyncOptions, SyncReport, SyncSummary, reconcile};
