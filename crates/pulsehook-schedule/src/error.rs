//! Schedule errors.

use thiserror::Error;

/// Schedule evaluation errors.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Expression does not parse as 5-field cron.
    #[error("Invalid schedule expression: {0}")]
    Invalid(String),
}
