//! # Pulsehook Schedule
//!
//! Decides whether a job is due at a given instant, independently of how
//! often the trigger loop wakes. Expressions are standard 5-field cron
//! (minute, hour, day-of-month, month, day-of-week) with `*`, ranges,
//! lists, and steps.

pub mod engine;
pub mod error;

pub use engine::{is_due, JobSchedule};
pub use error::ScheduleError;
