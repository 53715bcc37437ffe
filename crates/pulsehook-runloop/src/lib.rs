//! # Pulsehook Runloop
//!
//! The process-wide clock. Wakes on a fixed cadence, fetches a fresh job
//! snapshot, asks the schedule engine which jobs are due, and fans dispatch
//! out under a concurrency bound. Per-job failures stay per-job; only the
//! shutdown signal ends the loop.

pub mod shutdown;
pub mod trigger;

pub use shutdown::ShutdownSignal;
pub use trigger::{TickState, TriggerLoop, TriggerLoopConfig};
