use std::time::Duration;

use super::log_metric::LogMetrics;

/// Resolved configuration snapshot for one harness run.
///
/// Built once by [`ConfigLoader`](crate::infrastructure::config::ConfigLoader)
/// before any check runs and shared read-only afterwards. `Default` yields
/// zero values; built-in defaults live in the field table, not here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Upgrade testing options
    pub upgrade: UpgradeConfig,

    /// Access to an existing cluster
    pub kubeconfig: KubeConfig,

    /// Which tests run and how they poll
    pub tests: TestConfig,

    /// Cluster shape and lifecycle
    pub cluster: ClusterConfig,

    /// Control-plane API connection
    pub ocm: OcmConfig,

    /// Addon testing
    pub addons: AddonConfig,

    /// Scale testing
    pub scale: ScaleConfig,

    /// Weather reports
    pub weather: WeatherConfig,

    /// Provider used to create and delete clusters
    pub provider: String,

    /// Name of the current job run
    pub job_name: String,

    /// CI build number of the current job run
    pub job_id: i64,

    /// Root location for job artifacts
    pub base_job_url: String,

    /// Where JUnit results and logs are written
    pub report_dir: String,

    /// Appended to test names to identify the run
    pub suffix: String,

    /// Run everything up to the e2e tests, then skip them
    pub dry_run: bool,

    /// Regex counters applied to the build log
    pub log_metrics: LogMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeConfig {
    pub upgrade_to_cis_if_possible: bool,
    pub only_upgrade_to_z_releases: bool,
    pub next_release_after_prod_default_for_upgrade: i64,
    pub release_stream: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KubeConfig {
    /// Path of an existing kubeconfig
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OcmConfig {
    pub token: String,
    pub env: String,
    pub debug: bool,
    pub num_retries: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterConfig {
    pub multi_az: bool,
    pub destroy_after_test: bool,
    pub expiry: Duration,
    pub after_test_wait: Duration,
    pub install_timeout: Duration,
    pub use_latest_version_for_install: bool,
    pub use_middle_version_for_install: bool,
    pub use_oldest_version_for_install: bool,
    pub next_release_after_prod_default: i64,
    pub major_target: i64,
    pub minor_target: i64,
    pub clean_check_runs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddonConfig {
    pub ids: Vec<String>,
    pub test_harnesses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleConfig {
    pub workloads_repository: String,
    pub workloads_repository_branch: String,
    pub pbench_server: String,
    pub pbench_ssh_private_key: String,
    pub pbench_ssh_public_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestConfig {
    /// How long a check may poll for an object before failing
    pub polling_timeout: Duration,
    pub ginkgo_skip: String,
    pub ginkgo_focus: String,
    pub tests_to_run: Vec<String>,
    pub suppress_skip_notifications: bool,
    pub clean_runs: i64,
    /// Comma-delimited operator names whose health checks are ignored
    pub operator_skip: String,
    pub skip_cluster_health_checks: bool,
    pub upload_metrics: bool,
    pub metrics_bucket: String,
    pub service_account: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherConfig {
    pub prometheus_address: String,
    pub prometheus_bearer_token: String,
    pub start_of_time_window: Duration,
    pub number_of_samples_necessary: i64,
    pub slack_webhook: String,
    pub job_whitelist: Vec<String>,
}

impl TestConfig {
    /// Operator names listed in `operator_skip`.
    pub fn skipped_operators(&self) -> Vec<&str> {
        self.operator_skip
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }
}
