//! Loading and saving the catalog document.
//!
//! Two on-disk shapes are accepted: a bare array of apps, and an AltStore
//! source object with an `apps` array next to source-level fields (`name`,
//! `identifier`, `news`, ...). A document is saved back in the shape it was
//! loaded in.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::model::{AppEntry, Catalog};
use crate::persist::{self, StoreError};

/// Shape of a catalog document on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DocumentShape {
    /// A bare JSON array of apps.
    #[default]
    AppList,
    /// An object with an `apps` array; the map holds every other field.
    Source(Map<String, Value>),
}

/// A catalog plus the document shape it is stored in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogDocument {
    pub catalog: Catalog,
    pub shape: DocumentShape,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    AppList(Vec<AppEntry>),
    Source {
        #[serde(default)]
        apps: Vec<AppEntry>,
        #[serde(flatten)]
        rest: Map<String, Value>,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
enum RawDocumentRef<'a> {
    AppList(&'a [AppEntry]),
    Source {
        apps: &'a [AppEntry],
        #[serde(flatten)]
        rest: &'a Map<String, Value>,
    },
}

impl CatalogDocument {
    /// Wraps a catalog in the bare-array shape.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            shape: DocumentShape::AppList,
        }
    }

    /// Loads a catalog document. A missing file is an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or is
    /// neither accepted shape.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let Some(raw) = persist::read_json_if_exists::<RawDocument>(path)? else {
            info!(path = %path.display(), "catalog not found; starting empty");
            return Ok(Self::default());
        };

        let document = match raw {
            RawDocument::AppList(apps) => Self {
                catalog: Catalog::from_apps(apps),
                shape: DocumentShape::AppList,
            },
            RawDocument::Source { apps, rest } => Self {
                catalog: Catalog::from_apps(apps),
                shape: DocumentShape::Source(rest),
            },
        };

        debug!(
            path = %path.display(),
            apps = document.catalog.len(),
            versions = document.catalog.version_count(),
            "catalog loaded"
        );
        Ok(document)
    }

    /// Writes the document in its original shape.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let apps = self.catalog.apps();
        let raw = match &self.shape {
            DocumentShape::AppList => RawDocumentRef::AppList(apps),
            DocumentShape::Source(rest) => RawDocumentRef::Source { apps, rest },
        };
        persist::write_json(path, &raw)
    }
}
