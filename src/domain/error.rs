//! Domain-level errors (no I/O concerns)

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

/// Domain errors represent composition failures.
/// Every variant is attributed to a file path or a reference chain.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cycle detected in references: {}", format_chain(.chain))]
    CycleDetected { chain: Vec<PathBuf> },

    #[error("reference depth exceeds limit of {limit} at: {path}")]
    DepthExceeded { path: PathBuf, limit: usize },

    #[error("reference location {key} not found in {path}")]
    InvalidReference { path: PathBuf, key: String },

    #[error("composed document from {path} nests {depth} levels deep, readers accept at most {limit}")]
    NestingTooDeep {
        path: PathBuf,
        depth: usize,
        limit: usize,
    },

    #[error("cannot encode composed document: {0}")]
    Encode(#[from] serde_yaml::Error),
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain.iter().map(|p| p.display()).join(" -> ")
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
