//! Error types for unwiki library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for unwiki operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting, parsing, or writing wiki data.
#[derive(Error, Debug)]
pub enum Error {
    /// The response text is empty or whitespace-only.
    #[error("Wiki structure response is empty")]
    EmptyInput,

    /// The response contains no `<wiki_structure>` fragment.
    #[error("No valid XML structure found in response ({length} bytes)")]
    NoStructureFound {
        /// Length of the searched text in bytes
        length: usize,
    },

    /// The fragment was found but is not well-formed XML.
    #[error("Malformed wiki structure: {0}")]
    MalformedStructure(#[from] roxmltree::Error),

    /// The report destination could not be created or written.
    #[error("Failed to write report to {}: {source}", path.display())]
    Write {
        /// Destination that failed
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Nothing to put in an export payload.
    #[error("No wiki content to export: {0}")]
    NothingToExport(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Wrap an I/O failure on a report destination.
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }
}
