//! kube-e2e-harness - core of an end-to-end harness for managed Kubernetes
//!
//! The harness provisions clusters, runs health and feature checks against
//! them, and reports results. This crate holds the reusable core those
//! checks stand on.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): configuration model, field descriptors,
//!   log metrics and error types
//! - **Infrastructure Layer** (`infrastructure`): configuration resolution
//!   from YAML, environment and defaults; logging
//! - **Service Layer** (`services`): metric matching, poll-until-ready
//!   waiting, verification helpers, schema docs
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use kube_e2e_harness::{ConfigLoader, PollSchedule, ProcessEnv, ResolveContext};
//! use kube_e2e_harness::services::wait_for_count;
//!
//! let config = ConfigLoader::resolve(&ProcessEnv, None, &ResolveContext::generate())?;
//! let schedule = PollSchedule::from_tests(&config.tests, Duration::from_secs(30));
//! let secrets = wait_for_count("certificate secret", schedule, 1, || {
//!     kube.list_secrets("openshift-config", "certificate_request")
//! })?;
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{ConfigError, MissingField, WaitError};
pub use domain::models::{Config, LogMetric, LogMetrics, ResolveContext};
pub use infrastructure::config::{ConfigLoader, EnvSource, MapEnv, ProcessEnv};
pub use services::{MetricMatcher, MetricResult, PollReport, PollSchedule};
