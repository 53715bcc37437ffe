//! Dispatcher errors.

use thiserror::Error;

/// Dispatcher setup errors.
///
/// Dispatch itself is infallible at the type level: per-call failures are
/// carried inside `DispatchResult`.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}
