//! Command-line interface.
//!
//! A thin front end over the library: it decides where configuration comes
//! from, resolves it once, and hands the read-only snapshot to commands.

pub mod commands;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::domain::models::{Config, ResolveContext};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LogFormat};

pub use commands::config::{ConfigArgs, ConfigCommands};
pub use commands::metrics::MetricsArgs;

#[derive(Parser, Debug)]
#[command(
    name = "kube-e2e-harness",
    version,
    about = "End-to-end test harness for managed Kubernetes clusters"
)]
pub struct Cli {
    /// YAML configuration files, merged in order (later files win)
    #[arg(
        long = "config",
        short = 'c',
        global = true,
        env = "E2E_CONFIG",
        value_delimiter = ','
    )]
    pub configs: Vec<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG overrides it
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Also write JSON logs into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect, validate and document the configuration
    Config(ConfigArgs),
    /// Evaluate configured log metrics against a log file
    Metrics(MetricsArgs),
}

impl Cli {
    /// Logging settings derived from the global flags.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            log_dir: self.log_dir.clone(),
        }
    }
}

/// Resolve the configuration snapshot once for this process.
pub fn load_config(configs: &[PathBuf]) -> Result<Arc<Config>> {
    let context = ResolveContext::generate();
    let config = ConfigLoader::load(configs, &context).context("Failed to resolve configuration")?;

    tracing::info!(
        files = configs.len(),
        provider = %config.provider,
        log_metrics = config.log_metrics.len(),
        "configuration resolved"
    );

    Ok(Arc::new(config))
}

/// Print an error and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain,
        });
        eprintln!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
