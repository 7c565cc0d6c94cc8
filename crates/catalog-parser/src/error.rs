//! Error types for catalog-parser.

use std::path::PathBuf;

use thiserror::Error;

/// I/O failures while loading or persisting a workspace file.
///
/// Structural problems inside the document (dangling aliases, missing keys)
/// are never errors: they are logged and the offending entry is skipped.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The workspace file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The updated workspace file could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CatalogError {
    /// The file this error is about
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }
}
