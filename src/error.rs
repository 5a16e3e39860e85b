//! Error types for versioner operations.
//!
//! Defines `VersionerError` for all failure conditions and a crate-wide
//! `Result` alias.
//!
//! `RevisionNotFound` and `NoHistory` are normal, probeable outcomes rather
//! than faults: a file may simply have no history yet, or a commit may
//! predate the file.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VersionerError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Empty value for required argument: {0}")]
    EmptyArgument(&'static str),

    #[error("Repository unavailable at {path}: {reason}")]
    RepositoryUnavailable { path: PathBuf, reason: String },

    #[error("Remote transport failed during {operation}: {reason}")]
    Transport {
        operation: &'static str,
        reason: String,
    },

    #[error("No revision {commit} of file {path}")]
    RevisionNotFound { commit: String, path: String },

    #[error("Repository has no history (HEAD is unresolved)")]
    NoHistory,

    #[error("Nothing staged to commit")]
    NothingToCommit,

    #[error("Merge produced conflicts in {} file(s)", .0.len())]
    MergeConflicts(Vec<String>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VersionerError>;
