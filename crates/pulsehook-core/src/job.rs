//! The persisted job record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::JobError;

/// A webhook job.
///
/// Jobs are administered outside the dispatch loop; the loop only ever reads
/// a fresh snapshot of them on each tick.
#[derive(Clone, Serialize, Deserialize)]
pub struct Job {
    /// Record identifier, assigned at creation.
    pub id: Uuid,

    /// Target URL. Must be a well-formed absolute URL.
    pub endpoint: String,

    /// Bearer credential. Empty means the call is unauthenticated.
    #[serde(default)]
    pub secret: String,

    /// 5-field cron expression (minute hour day-of-month month day-of-week).
    pub schedule: String,
}

impl Job {
    /// Create a job with a fresh id and no secret.
    pub fn new(endpoint: impl Into<String>, schedule: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            endpoint: endpoint.into(),
            secret: String::new(),
            schedule: schedule.into(),
        }
    }

    /// Set the bearer secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = secret.into();
        self
    }

    /// Whether dispatch should attach an Authorization header.
    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Check the record invariants: endpoint parses as an absolute URL and
    /// the schedule is present.
    ///
    /// Schedule syntax is checked separately by the schedule engine.
    pub fn validate(&self) -> Result<(), JobError> {
        if self.endpoint.is_empty() {
            return Err(JobError::InvalidEndpoint("endpoint is empty".to_string()));
        }
        url::Url::parse(&self.endpoint)
            .map_err(|e| JobError::InvalidEndpoint(e.to_string()))?;
        if self.schedule.trim().is_empty() {
            return Err(JobError::EmptySchedule);
        }
        Ok(())
    }
}

// Secrets must never reach the log sink, so Debug is written by hand.
impl std::fmt::Debug for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("endpoint", &self.endpoint)
            .field("secret", &if self.secret.is_empty() { "<none>" } else { "<redacted>" })
            .field("schedule", &self.schedule)
            .finish()
    }
}
