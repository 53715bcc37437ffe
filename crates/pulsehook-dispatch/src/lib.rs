//! # Pulsehook Dispatch
//!
//! Issues one authenticated HTTP GET per due job. Failures never escape:
//! every call ends in a [`pulsehook_core::DispatchResult`], and one bad job
//! cannot block its siblings.

pub mod dispatcher;
pub mod error;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::DispatchError;
