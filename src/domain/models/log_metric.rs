//! Log metrics: named regex counters with pass/fail thresholds.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::ConfigError;

/// Threshold that never fails on the high side in practice.
pub const DEFAULT_HIGH_THRESHOLD: i64 = 9999;

/// Threshold that never fails on the low side (counts are never negative).
pub const DEFAULT_LOW_THRESHOLD: i64 = -1;

/// Returned by [`LogMetrics::get_metric_by_name`] when no metric matches.
static EMPTY_METRIC: LogMetric = LogMetric {
    name: String::new(),
    regex: String::new(),
    high_threshold: DEFAULT_HIGH_THRESHOLD,
    low_threshold: DEFAULT_LOW_THRESHOLD,
};

/// A metric name and a regex applied to the build log.
///
/// Every match in the log increments the metric's counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetric {
    /// Name of the metric
    pub name: String,

    /// Regex, in string form
    pub regex: String,

    /// Counts at or above this fail
    #[serde(default = "default_high_threshold")]
    pub high_threshold: i64,

    /// Counts at or below this fail
    #[serde(default = "default_low_threshold")]
    pub low_threshold: i64,
}

const fn default_high_threshold() -> i64 {
    DEFAULT_HIGH_THRESHOLD
}

const fn default_low_threshold() -> i64 {
    DEFAULT_LOW_THRESHOLD
}

impl LogMetric {
    /// Create a metric with permissive thresholds.
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
            high_threshold: DEFAULT_HIGH_THRESHOLD,
            low_threshold: DEFAULT_LOW_THRESHOLD,
        }
    }

    /// Set both thresholds.
    #[must_use]
    pub const fn with_thresholds(mut self, low: i64, high: i64) -> Self {
        self.low_threshold = low;
        self.high_threshold = high;
        self
    }

    /// Whether `count` lies strictly between the thresholds.
    ///
    /// Bounds are exclusive: a count equal to either threshold fails.
    pub fn is_passing(&self, count: usize) -> bool {
        let value = i64::try_from(count).unwrap_or(i64::MAX);
        self.low_threshold < value && value < self.high_threshold
    }

    /// True for the sentinel returned on a failed lookup.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.regex.is_empty()
    }

    /// Compile the pattern. An empty pattern compiles to `None` and counts
    /// nothing.
    pub fn compile(&self) -> Result<Option<Regex>, ConfigError> {
        if self.regex.is_empty() {
            return Ok(None);
        }
        Regex::new(&self.regex)
            .map(Some)
            .map_err(|err| ConfigError::InvalidMetricPattern {
                metric: self.name.clone(),
                pattern: self.regex.clone(),
                reason: err.to_string(),
            })
    }
}

/// Ordered collection of log metrics with lenient lookup by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogMetrics(pub Vec<LogMetric>);

impl LogMetrics {
    /// First metric named `name`, or an empty metric with permissive
    /// thresholds. Never fails.
    pub fn get_metric_by_name(&self, name: &str) -> &LogMetric {
        self.0
            .iter()
            .find(|metric| metric.name == name)
            .unwrap_or(&EMPTY_METRIC)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogMetric> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LogMetric>> for LogMetrics {
    fn from(metrics: Vec<LogMetric>) -> Self {
        Self(metrics)
    }
}

impl<'a> IntoIterator for &'a LogMetrics {
    type Item = &'a LogMetric;
    type IntoIter = std::slice::Iter<'a, LogMetric>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
