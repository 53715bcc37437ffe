//! # Pulsehook Core
//!
//! Shared types for the scheduled webhook dispatcher.
//!
//! - [`Job`]: a persisted webhook job (endpoint, schedule, optional secret)
//! - [`DispatchResult`]: the outcome of one outbound call, for logging only

pub mod error;
pub mod job;
pub mod result;

pub use error::JobError;
pub use job::Job;
pub use result::{DispatchOutcome, DispatchResult};
