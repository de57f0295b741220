//! Domain errors for the e2e harness core.

use std::fmt::{Debug, Display};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A required configuration field that was not set by any source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    /// YAML path of the field, e.g. `ocm.token`
    pub field: String,
    /// Environment variable that would have supplied it
    pub env: String,
}

/// Format missing fields as `ocm.token (env OCM_TOKEN), ...`.
fn format_missing(fields: &[MissingField]) -> String {
    fields
        .iter()
        .map(|f| format!("{} (env {})", f.field, f.env))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors produced while resolving the configuration snapshot.
///
/// Every variant is fatal: the run aborts before any check executes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required configuration fields: {}", format_missing(.0))]
    MissingRequiredField(Vec<MissingField>),

    #[error("Invalid value for {field}: {value:?} is not a valid {expected}")]
    InvalidFieldType {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Invalid regex for log metric '{metric}' ({pattern:?}): {reason}")]
    InvalidMetricPattern {
        metric: String,
        pattern: String,
        reason: String,
    },

    #[error("Invalid logMetrics section: {0}")]
    InvalidLogMetrics(String),

    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl ConfigError {
    /// Names of the missing fields, if this is a `MissingRequiredField` error.
    pub fn missing_fields(&self) -> Vec<&str> {
        match self {
            Self::MissingRequiredField(fields) => fields.iter().map(|f| f.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(err.to_string())
    }
}

/// Terminal failure of a poll-until-ready wait.
///
/// A predicate error and a timeout are kept apart so that "not ready yet"
/// is never confused with a hard failure.
#[derive(Debug, Error)]
pub enum WaitError<E> {
    #[error("Check '{condition}' failed: {error}")]
    Predicate { condition: String, error: E },

    #[error("Timed out waiting for '{condition}' after {elapsed:?} ({attempts} attempts)")]
    TimedOut {
        condition: String,
        elapsed: Duration,
        attempts: u32,
    },
}

impl<E> WaitError<E> {
    /// True if the wait ran out of time rather than failing.
    pub const fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    /// The predicate's error, if the wait ended on one.
    pub const fn predicate_error(&self) -> Option<&E> {
        match self {
            Self::Predicate { error, .. } => Some(error),
            Self::TimedOut { .. } => None,
        }
    }

    /// Name of the condition being waited on.
    pub fn condition(&self) -> &str {
        match self {
            Self::Predicate { condition, .. } | Self::TimedOut { condition, .. } => condition,
        }
    }
}

impl<E: Display + Debug + Send + Sync + 'static> WaitError<E> {
    /// Convert into an `anyhow::Error` for callers that only report.
    pub fn into_anyhow(self) -> anyhow::Error {
        anyhow::Error::msg(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_names_every_field() {
        let err = ConfigError::MissingRequiredField(vec![
            MissingField {
                field: "ocm.token".to_string(),
                env: "OCM_TOKEN".to_string(),
            },
            MissingField {
                field: "weather.address".to_string(),
                env: "PROMETHEUS_ADDRESS".to_string(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.contains("ocm.token (env OCM_TOKEN)"));
        assert!(msg.contains("weather.address (env PROMETHEUS_ADDRESS)"));
        assert_eq!(err.missing_fields(), vec!["ocm.token", "weather.address"]);
    }

    #[test]
    fn test_wait_error_kinds() {
        let timed_out: WaitError<String> = WaitError::TimedOut {
            condition: "secrets".to_string(),
            elapsed: Duration::from_secs(2),
            attempts: 3,
        };
        assert!(timed_out.is_timed_out());
        assert!(timed_out.predicate_error().is_none());
        assert!(timed_out.to_string().contains("secrets"));

        let failed = WaitError::Predicate {
            condition: "apiserver".to_string(),
            error: "connection refused".to_string(),
        };
        assert!(!failed.is_timed_out());
        assert_eq!(failed.predicate_error().map(String::as_str), Some("connection refused"));
        assert_eq!(failed.condition(), "apiserver");
    }
}
