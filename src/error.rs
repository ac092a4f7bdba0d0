//! Error taxonomy for catalog loading and querying.
//!
//! Fatal load errors (missing root, duplicate slugs, broken gateway targets)
//! abort before any partial catalog escapes; query contract violations carry
//! their own exit code so the CLI can distinguish caller mistakes from corpus
//! problems. Parse-time trouble is deliberately absent here; malformed
//! front-matter is a warning on the document, never an error.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("skill root {} does not exist or is not a directory", path.display())]
    RootNotFound { path: PathBuf },

    #[error("duplicate document slug '{id}': {} and {}", first.display(), second.display())]
    DuplicateId {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no markdown documents found under {}", path.display())]
    EmptyCatalog { path: PathBuf },

    #[error("gateway '{gateway}' targets unknown category '{target}'")]
    DanglingGateway { gateway: String, target: String },

    #[error("query keyword must not be empty")]
    InvalidQuery,

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error kind.
    ///
    /// Contract violations (empty keyword) exit 2; everything else is a load
    /// failure and exits 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            CatalogError::InvalidQuery => 2,
            _ => 1,
        }
    }
}
