//! Markdown documentation for the configuration schema.
//!
//! A read-only projection of the field table: one table per section.

use std::fmt::Write;

use crate::domain::models::FieldSpec;

/// Render every field as Markdown, grouped by section in table order.
pub fn render_markdown(fields: &[FieldSpec]) -> String {
    let mut out = String::from("# Configuration\n\n");
    out.push_str(
        "Values are taken from YAML first, then the environment variable, then the \
         default. Durations given as bare numbers use the unit shown in the type.\n",
    );

    let mut sections: Vec<&str> = Vec::new();
    for spec in fields {
        if !sections.contains(&spec.section()) {
            sections.push(spec.section());
        }
    }

    for section in sections {
        let _ = write!(out, "\n## {section}\n\n");
        out.push_str("| YAML path | Environment | Type | Default | Required | Description |\n");
        out.push_str("|---|---|---|---|---|---|\n");

        for spec in fields.iter().filter(|s| s.section() == section) {
            let default = spec
                .default
                .map(|d| format!("`{}`", d.describe()))
                .unwrap_or_default();
            let required = if spec.required { "yes" } else { "" };
            let _ = writeln!(
                out,
                "| `{}` | `{}` | {} | {} | {} | {} |",
                spec.yaml_path,
                spec.env,
                spec.kind,
                default,
                required,
                escape_cell(spec.description)
            );
        }
    }

    out.push_str(
        "\n## logMetrics\n\nYAML only. A list of `{name, regex, highThreshold, lowThreshold}`; \
         a metric passes when `lowThreshold < count < highThreshold`. Thresholds default to \
         `-1` and `9999`.\n",
    );

    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
