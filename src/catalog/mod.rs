//! The app catalog: records, merging, ordering, and storage.
//!
//! # Architecture
//!
//! - [`Catalog`] / [`AppEntry`] / [`VersionRecord`] - AltStore-shaped records
//! - [`merge_versions`] - Appends new versions or creates a missing app
//! - [`sort_catalog`] - Newest-release-first ordering
//! - [`CatalogDocument`] - Load/save in either on-disk shape

mod merge;
mod model;
mod sort;
mod store;

pub use merge::{DedupStrategy, MergeOutcome, creates_entry, merge_versions};
pub use model::{AppEntry, Catalog, VersionRecord};
pub use sort::{latest_release_date, sort_catalog};
pub use store::{CatalogDocument, DocumentShape};
