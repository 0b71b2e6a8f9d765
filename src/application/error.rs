//! Application-level errors (wraps domain errors)

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::ApiError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config at {path} is invalid:\n{}", format_messages(.errors))]
    ValidationFailed { path: PathBuf, errors: Vec<String> },

    #[error("config service unavailable: {0}")]
    ServiceUnavailable(#[from] ApiError),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn format_messages(errors: &[String]) -> String {
    errors.iter().map(|e| format!("  - {e}")).join("\n")
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
