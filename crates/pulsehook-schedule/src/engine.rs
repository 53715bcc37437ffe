//! Cron expression parsing and due-time evaluation.

use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use cron::Schedule;

use crate::error::ScheduleError;

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

/// A parsed job schedule.
///
/// Jobs use the classic 5-field form. The underlying parser wants a seconds
/// field, so a literal `0` is prepended before parsing; evaluation then
/// works on tick times truncated to the minute.
pub struct JobSchedule {
    inner: Schedule,
    expr: String,
}

impl JobSchedule {
    /// Parse a 5-field cron expression.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Invalid`] when the expression does not have
    /// exactly five fields or any field fails to parse.
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let fields: Vec<&str> = expr.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ScheduleError::Invalid(format!(
                "expected 5 fields, got {}",
                fields.len()
            )));
        }

        let normalized = format!("0 {}", fields.join(" "));
        let inner = Schedule::from_str(&normalized)
            .map_err(|e| ScheduleError::Invalid(e.to_string()))?;

        Ok(Self {
            inner,
            expr: expr.to_string(),
        })
    }

    /// The original expression string.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Whether the schedule matches `at`, truncated to the minute.
    ///
    /// Deterministic: the same instant always yields the same answer.
    pub fn is_due(&self, at: DateTime<Utc>) -> bool {
        let minute = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        self.inner.includes(minute)
    }

    /// The next matching instant strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.inner.after(&after).next()
    }
}

impl std::fmt::Debug for JobSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobSchedule").field("expr", &self.expr).finish()
    }
}

/// Parse and evaluate in one step.
///
/// This is what the trigger loop calls per job per tick; parse failures are
/// per-job errors and must not disturb sibling jobs.
pub fn is_due(expr: &str, at: DateTime<Utc>) -> Result<bool, ScheduleError> {
    Ok(JobSchedule::parse(expr)?.is_due(at))
}
