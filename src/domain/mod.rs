//! Domain layer for the e2e harness
//!
//! Configuration model, field descriptors, log metrics and error types.
//! Nothing in here touches the environment, the filesystem or a cluster.

pub mod errors;
pub mod models;

// Re-export error types for convenient access
pub use errors::{ConfigError, MissingField, WaitError};
