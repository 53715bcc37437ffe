//! Store errors.

use thiserror::Error;

/// Job store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open the database. Fatal at startup.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// The store did not answer within the configured bound.
    #[error("Store timed out: {0}")]
    Timeout(String),

    /// A query failed. Aborts the current tick only.
    #[error("Store query error: {0}")]
    Query(String),
}
