//! Domain-level errors (no I/O concerns except where builders read input)

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by tree construction and lookup.
///
/// Payloads are rendered through their `Debug` form so the error type stays
/// independent of `T`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("duplicate entry among siblings: {0}")]
    DuplicateKey(String),

    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("tree invariant violated: {0}")]
    InvariantViolation(String),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors raised while building a tree from an outline or a directory.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("malformed outline at line {line}: {reason}")]
    MalformedOutline { line: usize, reason: String },

    #[error("line {line}: {source}")]
    Tree {
        line: usize,
        #[source]
        source: TreeError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to walk {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("{path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: TreeError,
    },
}

/// Result type for builder operations.
pub type BuildResult<T> = Result<T, BuildError>;
