//! Dispatch outcomes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::job::Job;

/// What came back from one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The endpoint answered with this HTTP status.
    Status(u16),

    /// The call never produced a status: malformed URL, refused
    /// connection, timeout.
    Error(String),
}

impl DispatchOutcome {
    /// True for 2xx statuses only.
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Status(code) if (200..300).contains(code))
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchOutcome::Status(code) => write!(f, "status {}", code),
            DispatchOutcome::Error(e) => write!(f, "error: {}", e),
        }
    }
}

/// The result of dispatching one job. Ephemeral: logged, never persisted.
#[derive(Debug, Clone)]
pub struct DispatchResult {
    /// Job the call was made for.
    pub job_id: Uuid,

    /// Target endpoint.
    pub endpoint: String,

    /// Status or error.
    pub outcome: DispatchOutcome,

    /// When the dispatch finished.
    pub at: DateTime<Utc>,
}

impl DispatchResult {
    /// Build a result for `job` stamped with the current time.
    pub fn new(job: &Job, outcome: DispatchOutcome) -> Self {
        Self {
            job_id: job.id,
            endpoint: job.endpoint.clone(),
            outcome,
            at: Utc::now(),
        }
    }

    /// True when the endpoint answered 2xx.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
