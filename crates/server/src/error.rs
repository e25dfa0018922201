//! Application error handling

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use readmit_core::{CoreError, IssueType, OperationOutcome};

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// The parser or labeler rejected the patient's data
    Core(CoreError),
    Internal(String),
}

impl AppError {
    fn reason(&self) -> &'static str {
        match self {
            AppError::Core(CoreError::MalformedInput(_)) => "malformed_input",
            AppError::Core(CoreError::InvalidTimestamp { .. }) => "invalid_timestamp",
            AppError::Core(CoreError::Io { .. }) | AppError::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        metrics::counter!("bundles_rejected_total", "reason" => self.reason()).increment(1);

        let (status, outcome) = match &self {
            AppError::Core(err @ (CoreError::MalformedInput(_) | CoreError::InvalidTimestamp { .. })) => {
                (StatusCode::BAD_REQUEST, OperationOutcome::from(err))
            }
            AppError::Core(err) => {
                tracing::error!(error = %err, "Unexpected core failure");
                (StatusCode::INTERNAL_SERVER_ERROR, OperationOutcome::from(err))
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                OperationOutcome::error(IssueType::Exception, msg),
            ),
        };

        (status, Json(outcome)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::Core(err)
    }
}
