//! Job record errors.

use thiserror::Error;

/// Job record validation errors.
#[derive(Debug, Error)]
pub enum JobError {
    /// Endpoint is empty or not an absolute URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Schedule expression is empty.
    #[error("Schedule must not be empty")]
    EmptySchedule,
}
