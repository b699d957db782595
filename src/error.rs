//! Error types for timetable generation.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::data::TimetableResponse;

/// Failures of the record source collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Errors that abort a whole generation call.
///
/// Per-slot unavailability is not an error; it is recorded in the
/// conflict log and allocation carries on.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid {kind} record {id}: {reason}")]
    InvalidRecord {
        kind: &'static str,
        id: String,
        reason: String,
    },

    #[error("record source error: {0}")]
    Store(#[from] StoreError),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl SchedulerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SchedulerError::InvalidRequest(_) | SchedulerError::InvalidRecord { .. } => {
                StatusCode::BAD_REQUEST
            }
            SchedulerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SchedulerError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(TimetableResponse::failed(&self))).into_response()
    }
}
