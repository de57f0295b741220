//! kube-e2e-harness CLI entry point.

use clap::Parser;

use kube_e2e_harness::cli::{Cli, Commands};
use kube_e2e_harness::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logger = match LoggerImpl::init(&cli.log_config()) {
        Ok(logger) => logger,
        Err(err) => kube_e2e_harness::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Config(args) => {
            kube_e2e_harness::cli::commands::config::execute(args, &cli.configs, cli.json).await
        }
        Commands::Metrics(args) => {
            kube_e2e_harness::cli::commands::metrics::execute(args, &cli.configs, cli.json).await
        }
    };

    if let Err(err) = result {
        kube_e2e_harness::cli::handle_error(err, cli.json);
    }
}
