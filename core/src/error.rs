use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading resources or reading persisted indexes.
///
/// Query lookups never produce an error: an absent term is reported as
/// [`crate::query::Lookup::NotFound`].
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("missing or unreadable resource {}: {source}", path.display())]
    MissingResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8 (first bad byte at offset {offset})", path.display())]
    Encoding { path: PathBuf, offset: usize },

    #[error("duplicate document id: {0}")]
    DuplicateDocument(String),

    #[error("malformed index line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    pub(crate) fn missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IndexError::MissingResource { path: path.into(), source }
    }

    /// Whether the error is tied to one document and may be skipped under a
    /// lenient encoding policy.
    pub fn is_per_document(&self) -> bool {
        matches!(self, IndexError::Encoding { .. })
    }
}
