//! Infrastructure layer module
//!
//! Adapters to the outside world:
//! - Configuration resolution (environment variables, YAML files)
//! - Logging infrastructure

pub mod config;
pub mod logging;
