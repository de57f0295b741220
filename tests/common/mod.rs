//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::io::Write;
use std::path::PathBuf;

use kube_e2e_harness::ResolveContext;
use tempfile::{NamedTempFile, TempDir};

/// Environment variables that every test must control, so that the
/// developer's shell cannot leak into resolution.
#[allow(dead_code)]
pub const HARNESS_VARS: &[&str] = &[
    "OCM_TOKEN",
    "OSD_ENV",
    "NUM_RETRIES",
    "POLLING_TIMEOUT",
    "ADDON_IDS",
    "MULTI_AZ",
    "REPORT_DIR",
    "SUFFIX",
];

/// Create a temporary directory for test isolation
#[allow(dead_code)]
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write YAML to a temporary file that lives as long as the handle.
#[allow(dead_code)]
pub fn yaml_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{contents}").expect("Failed to write YAML");
    file.flush().expect("Failed to flush YAML");
    file
}

/// Resolution context with fixed placeholders.
#[allow(dead_code)]
pub fn fixed_context() -> ResolveContext {
    ResolveContext::fixed(PathBuf::from("/tmp"), "t01")
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
