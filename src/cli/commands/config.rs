//! Implementation of the `config` commands.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::load_config;
use crate::cli::output::table::FieldRow;
use crate::cli::output::{output, redact, CommandOutput, TableFormatter};
use crate::domain::models::{Config, FieldSpec, LogMetric};
use crate::infrastructure::config::FIELDS;
use crate::services::render_markdown;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print every resolved field (secrets redacted)
    Show,
    /// Resolve the configuration and report problems
    Validate,
    /// Print the configuration schema as Markdown
    Docs,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowOutput {
    pub fields: Vec<FieldRow>,
    pub log_metrics: Vec<LogMetric>,
}

impl ShowOutput {
    pub fn from_config(config: &Config) -> Self {
        let fields = FIELDS
            .iter()
            .map(|spec| FieldRow {
                yaml_path: spec.yaml_path.to_string(),
                env: spec.env.to_string(),
                value: redact(&(spec.read)(config).to_string(), spec.secret),
            })
            .collect();

        Self {
            fields,
            log_metrics: config.log_metrics.iter().cloned().collect(),
        }
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut out = formatter.format_fields(&self.fields);
        if !self.log_metrics.is_empty() {
            out.push_str("\n\nLog metrics:\n");
            out.push_str(&formatter.format_log_metrics(&self.log_metrics));
        }
        out
    }

    fn to_json(&self) -> serde_json::Value {
        let fields: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|row| (row.yaml_path.clone(), serde_json::Value::from(row.value.as_str())))
            .collect();
        serde_json::json!({
            "fields": fields,
            "logMetrics": self.log_metrics,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateOutput {
    pub valid: bool,
    pub config_files: Vec<PathBuf>,
    pub field_count: usize,
    pub log_metric_count: usize,
}

impl CommandOutput for ValidateOutput {
    fn to_human(&self) -> String {
        let sources = if self.config_files.is_empty() {
            "environment and defaults".to_string()
        } else {
            self.config_files
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Configuration is valid ({} fields, {} log metrics) from {}",
            self.field_count, self.log_metric_count, sources
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsField {
    pub yaml_path: &'static str,
    pub env: &'static str,
    #[serde(rename = "type")]
    pub kind: String,
    pub default: Option<String>,
    pub required: bool,
    pub secret: bool,
    pub description: &'static str,
}

impl From<&FieldSpec> for DocsField {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            yaml_path: spec.yaml_path,
            env: spec.env,
            kind: spec.kind.to_string(),
            default: spec.default.map(|d| d.describe()),
            required: spec.required,
            secret: spec.secret,
            description: spec.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocsOutput {
    pub fields: Vec<DocsField>,
}

impl CommandOutput for DocsOutput {
    fn to_human(&self) -> String {
        render_markdown(FIELDS)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.fields).unwrap_or_default()
    }
}

pub async fn execute(args: ConfigArgs, configs: &[PathBuf], json_mode: bool) -> Result<()> {
    match args.command {
        ConfigCommands::Show => {
            let config = load_config(configs)?;
            output(&ShowOutput::from_config(&config), json_mode);
        }
        ConfigCommands::Validate => {
            let config = load_config(configs)?;
            output(
                &ValidateOutput {
                    valid: true,
                    config_files: configs.to_vec(),
                    field_count: FIELDS.len(),
                    log_metric_count: config.log_metrics.len(),
                },
                json_mode,
            );
        }
        ConfigCommands::Docs => {
            let fields = FIELDS.iter().map(DocsField::from).collect();
            output(&DocsOutput { fields }, json_mode);
        }
    }
    Ok(())
}
