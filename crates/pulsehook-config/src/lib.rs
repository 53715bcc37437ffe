//! # Pulsehook Config
//!
//! TOML configuration for the dispatch service.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
