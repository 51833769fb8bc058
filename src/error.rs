//! Crate-wide error types.
//!
//! Library modules return [`Error`] via `thiserror`, while the CLI wraps
//! everything in `anyhow` for reporting.
//!
//! # Taxonomy
//!
//! - [`Error::ContainerRead`]: the file could not be opened or parsed as a
//!   tagged audio container. Fatal for the whole extraction.
//! - [`Error::MalformedBox`]: a store-id box was present but its payload is
//!   not the fixed-width integer it should be. Fatal for the extraction.
//! - Undecodable jacket images never surface here; the jacket is simply
//!   reported as absent.

use std::path::PathBuf;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error from one of the container readers.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File cannot be opened or parsed as a tagged audio container
    #[error("Failed to read tags from {path}: {source}")]
    ContainerRead {
        path: PathBuf,
        #[source]
        source: BoxedSource,
    },

    /// A vendor box payload has the wrong width for its integer type
    #[error("Malformed '{code}' box: expected {expected} bytes, found {actual}")]
    MalformedBox {
        code: String,
        expected: usize,
        actual: usize,
    },

    /// File I/O error (jacket export)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a container read error.
    pub fn container_read(path: impl Into<PathBuf>, source: impl Into<BoxedSource>) -> Self {
        Self::ContainerRead {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Create a malformed box error for a four-character code.
    pub fn malformed_box(code: &[u8; 4], expected: usize, actual: usize) -> Self {
        Self::MalformedBox {
            code: String::from_utf8_lossy(code).into_owned(),
            expected,
            actual,
        }
    }
}
