use std::path::PathBuf;

use crate::outcome::{IssueType, OperationOutcome};
use thiserror::Error;

/// Errors raised while parsing or labeling a single patient's bundle
#[derive(Debug, Error)]
pub enum CoreError {
    /// The top-level document is not structured data at all
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// A timestamp that the labeling pass needs could not be interpreted
    #[error("Invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    pub(crate) fn invalid_timestamp(value: &str) -> Self {
        CoreError::InvalidTimestamp {
            value: value.to_string(),
        }
    }

    /// FHIR issue type that best describes this error
    pub fn issue_type(&self) -> IssueType {
        match self {
            CoreError::MalformedInput(_) => IssueType::Structure,
            CoreError::InvalidTimestamp { .. } => IssueType::Value,
            CoreError::Io { .. } => IssueType::Exception,
        }
    }
}

impl From<&CoreError> for OperationOutcome {
    fn from(err: &CoreError) -> Self {
        OperationOutcome::error(err.issue_type(), &err.to_string())
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
