//! Table output formatting for CLI commands
//!
//! Renders resolved configuration and log metric verdicts with comfy-table.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::LogMetric;
use crate::services::MetricResult;

/// One resolved field, ready for display.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRow {
    pub yaml_path: String,
    pub env: String,
    pub value: String,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format resolved configuration fields
    pub fn format_fields(&self, rows: &[FieldRow]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Field").add_attribute(Attribute::Bold),
            Cell::new("Env").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        for row in rows {
            table.add_row(vec![
                Cell::new(&row.yaml_path),
                Cell::new(&row.env),
                Cell::new(&row.value),
            ]);
        }

        table.to_string()
    }

    /// Format configured log metrics
    pub fn format_log_metrics(&self, metrics: &[LogMetric]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Regex").add_attribute(Attribute::Bold),
            Cell::new("Low").add_attribute(Attribute::Bold),
            Cell::new("High").add_attribute(Attribute::Bold),
        ]);

        for metric in metrics {
            table.add_row(vec![
                Cell::new(&metric.name),
                Cell::new(&metric.regex),
                Cell::new(metric.low_threshold),
                Cell::new(metric.high_threshold),
            ]);
        }

        table.to_string()
    }

    /// Format metric verdicts, coloring the status column
    pub fn format_metric_results(&self, results: &[MetricResult]) -> String {
        let mut table = self.create_base_table();
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Count").add_attribute(Attribute::Bold),
            Cell::new("Bounds").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

        for result in results {
            let status = if result.passing { "PASS" } else { "FAIL" };
            let status_cell = if self.use_colors {
                Cell::new(status).fg(if result.passing { Color::Green } else { Color::Red })
            } else {
                Cell::new(status)
            };

            table.add_row(vec![
                Cell::new(&result.name),
                Cell::new(result.count),
                Cell::new(format!("({}, {})", result.low_threshold, result.high_threshold)),
                status_cell,
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
