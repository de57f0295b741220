//! Log metric evaluation.
//!
//! Counts regex matches in build-log text and classifies each metric as
//! passing or failing against its thresholds. Patterns are compiled once
//! when the matcher is built.

use regex::Regex;
use serde::Serialize;

use crate::domain::errors::ConfigError;
use crate::domain::models::{LogMetric, LogMetrics};

/// Verdict for one metric against one log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub name: String,
    pub count: usize,
    pub low_threshold: i64,
    pub high_threshold: i64,
    pub passing: bool,
}

/// Compiled log metrics.
#[derive(Debug, Clone)]
pub struct MetricMatcher {
    metrics: LogMetrics,
    patterns: Vec<Option<Regex>>,
}

impl MetricMatcher {
    /// Compile every metric's pattern.
    pub fn new(metrics: &LogMetrics) -> Result<Self, ConfigError> {
        let patterns = metrics
            .iter()
            .map(LogMetric::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            metrics: metrics.clone(),
            patterns,
        })
    }

    /// The metrics this matcher evaluates.
    pub const fn metrics(&self) -> &LogMetrics {
        &self.metrics
    }

    /// Lenient lookup; unknown names yield the permissive empty metric.
    pub fn metric(&self, name: &str) -> &LogMetric {
        self.metrics.get_metric_by_name(name)
    }

    /// Non-overlapping, non-empty matches of the named metric in `log_text`.
    ///
    /// An unknown name resolves to the empty metric, which counts nothing.
    pub fn count_matches(&self, metric_name: &str, log_text: &str) -> usize {
        self.metrics
            .iter()
            .position(|metric| metric.name == metric_name)
            .and_then(|idx| self.patterns[idx].as_ref())
            .map_or(0, |pattern| count_with(pattern, log_text))
    }

    /// Whether `count` passes the named metric's thresholds.
    pub fn is_passing(&self, metric_name: &str, count: usize) -> bool {
        self.metric(metric_name).is_passing(count)
    }

    /// Evaluate every metric in order.
    pub fn evaluate(&self, log_text: &str) -> Vec<MetricResult> {
        self.metrics
            .iter()
            .zip(&self.patterns)
            .map(|(metric, pattern)| {
                let count = pattern.as_ref().map_or(0, |p| count_with(p, log_text));
                let passing = metric.is_passing(count);

                tracing::debug!(metric = %metric.name, count, passing, "evaluated log metric");

                MetricResult {
                    name: metric.name.clone(),
                    count,
                    low_threshold: metric.low_threshold,
                    high_threshold: metric.high_threshold,
                    passing,
                }
            })
            .collect()
    }
}

/// Count matches of a one-off metric without building a matcher.
pub fn count_matches(metric: &LogMetric, log_text: &str) -> Result<usize, ConfigError> {
    Ok(metric
        .compile()?
        .map_or(0, |pattern| count_with(&pattern, log_text)))
}

// Empty matches are not occurrences of a log pattern.
fn count_with(pattern: &Regex, log_text: &str) -> usize {
    pattern
        .find_iter(log_text)
        .filter(|m| !m.as_str().is_empty())
        .count()
}
