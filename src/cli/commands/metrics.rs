//! Implementation of the `metrics` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::cli::load_config;
use crate::cli::output::{output, CommandOutput, TableFormatter};
use crate::services::{MetricMatcher, MetricResult};

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Build log to scan
    pub log_file: PathBuf,

    /// Only evaluate these metrics (repeatable)
    #[arg(long = "metric", short = 'm')]
    pub metrics: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOutput {
    pub log_file: PathBuf,
    pub evaluated_at: DateTime<Utc>,
    pub passing: bool,
    pub results: Vec<MetricResult>,
}

impl MetricsOutput {
    pub fn failing(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.passing)
            .map(|r| r.name.as_str())
            .collect()
    }
}

impl CommandOutput for MetricsOutput {
    fn to_human(&self) -> String {
        if self.results.is_empty() {
            return format!("No log metrics configured for {}", self.log_file.display());
        }
        TableFormatter::new().format_metric_results(&self.results)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Evaluate metrics against log text, optionally restricted to `only`.
///
/// Names in `only` that are not configured evaluate as the empty metric:
/// zero matches, passing.
pub fn evaluate(matcher: &MetricMatcher, log_text: &str, only: &[String]) -> Vec<MetricResult> {
    if only.is_empty() {
        return matcher.evaluate(log_text);
    }

    only.iter()
        .map(|name| {
            let metric = matcher.metric(name);
            let count = matcher.count_matches(name, log_text);
            MetricResult {
                name: name.clone(),
                count,
                low_threshold: metric.low_threshold,
                high_threshold: metric.high_threshold,
                passing: metric.is_passing(count),
            }
        })
        .collect()
}

/// Read a build log and evaluate it.
///
/// Logs often carry stray binary output, so invalid UTF-8 is replaced
/// rather than rejected.
pub async fn evaluate_file(
    matcher: &MetricMatcher,
    log_file: &Path,
    only: &[String],
) -> Result<Vec<MetricResult>> {
    let bytes = tokio::fs::read(log_file)
        .await
        .with_context(|| format!("Failed to read log file {}", log_file.display()))?;

    let log_text = String::from_utf8_lossy(&bytes);
    Ok(evaluate(matcher, &log_text, only))
}

pub async fn execute(args: MetricsArgs, configs: &[PathBuf], json_mode: bool) -> Result<()> {
    let config = load_config(configs)?;
    let matcher = MetricMatcher::new(&config.log_metrics)?;

    let results = evaluate_file(&matcher, &args.log_file, &args.metrics).await?;
    let result = MetricsOutput {
        log_file: args.log_file,
        evaluated_at: Utc::now(),
        passing: results.iter().all(|r| r.passing),
        results,
    };

    output(&result, json_mode);

    let failing = result.failing();
    if !failing.is_empty() {
        anyhow::bail!(
            "{} log metric(s) outside thresholds: {}",
            failing.len(),
            failing.join(", ")
        );
    }

    Ok(())
}
