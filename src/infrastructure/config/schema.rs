//! The configuration field table.
//!
//! One row per configuration leaf. Resolution, `config show` and the
//! generated docs all iterate this table; nothing inspects struct layout at
//! runtime.

use crate::domain::models::field::{assign, FieldSlot};
use crate::domain::models::{DefaultValue, DurationUnit, FieldKind, FieldSpec};

macro_rules! default_value {
    (report_dir) => {
        DefaultValue::ReportDir
    };
    (run_suffix) => {
        DefaultValue::RunSuffix
    };
    ($raw:literal) => {
        DefaultValue::Literal($raw)
    };
}

macro_rules! field {
    (@default) => {
        None
    };
    (@default $default:tt) => {
        Some(default_value!($default))
    };
    (
        $($path:ident).+ : $kind:ident $(($unit:ident))?,
        $yaml:literal,
        env $env:literal
        $(, default = $default:tt)?
        $(, required = $required:literal)?
        $(, secret = $secret:literal)?
        => $doc:literal
    ) => {
        FieldSpec {
            yaml_path: $yaml,
            env: $env,
            kind: FieldKind::$kind $((DurationUnit::$unit))?,
            default: field!(@default $($default)?),
            required: false $(|| $required)?,
            secret: false $(|| $secret)?,
            description: $doc,
            apply: |config, value| assign(&mut config $(.$path)+, value),
            read: |config| config $(.$path)+ .to_field_value(),
        }
    };
}

/// Every configuration field, in resolution and documentation order.
pub static FIELDS: &[FieldSpec] = &[
    // Top-level run fields
    field!(provider: String, "provider", env "PROVIDER", default = "ocm"
        => "Provider used to create and delete clusters."),
    field!(job_name: String, "jobName", env "JOB_NAME"
        => "Name of the current e2e job run."),
    field!(job_id: Integer, "jobID", env "BUILD_NUMBER"
        => "CI build number of the current run."),
    field!(base_job_url: String, "baseJobURL", env "BASE_JOB_URL",
        default = "https://storage.googleapis.com/origin-ci-test/logs"
        => "Root location for all job artifacts."),
    field!(report_dir: String, "reportDir", env "REPORT_DIR", default = report_dir
        => "Directory where JUnit results and logs are written."),
    field!(suffix: String, "suffix", env "SUFFIX", default = run_suffix
        => "Appended to test names to identify this run."),
    field!(dry_run: Boolean, "dryRun", env "DRY_RUN", default = "false"
        => "Run everything up to the e2e tests, then skip them."),
    // Upgrade
    field!(upgrade.upgrade_to_cis_if_possible: Boolean, "upgrade.upgradeToCISIfPossible",
        env "UPGRADE_TO_CIS_IF_POSSIBLE", default = "false"
        => "Upgrade to the newest cluster image set if it is newer than the install version."),
    field!(upgrade.only_upgrade_to_z_releases: Boolean, "upgrade.onlyUpgradeToZReleases",
        env "ONLY_UPGRADE_TO_Z_RELEASES", default = "false"
        => "Restrict upgrades to Z releases on stage and prod."),
    field!(upgrade.next_release_after_prod_default_for_upgrade: Integer,
        "upgrade.nextReleaseAfterProdDefaultForUpgrade",
        env "NEXT_RELEASE_AFTER_PROD_DEFAULT_FOR_UPGRADE", default = "-1"
        => "Upgrade to the image set this many releases after the production default."),
    field!(upgrade.release_stream: String, "upgrade.releaseStream", env "UPGRADE_RELEASE_STREAM"
        => "Release stream used to pick an upgrade image."),
    // Kubeconfig
    field!(kubeconfig.path: String, "kubeconfig.path", env "TEST_KUBECONFIG"
        => "Path of an existing kubeconfig."),
    // OCM
    field!(ocm.token: String, "ocm.token", env "OCM_TOKEN", required = true, secret = true
        => "Token used to authenticate with the control-plane API."),
    field!(ocm.env: String, "ocm.env", env "OSD_ENV", default = "prod"
        => "Environment used to provision clusters."),
    field!(ocm.debug: Boolean, "ocm.debug", env "DEBUG_OSD", default = "false"
        => "Show debug level messages from the API client."),
    field!(ocm.num_retries: Integer, "ocm.numRetries", env "NUM_RETRIES", default = "3"
        => "Number of times to retry each API call."),
    // Cluster
    field!(cluster.multi_az: Boolean, "cluster.multiAZ", env "MULTI_AZ", default = "false"
        => "Deploy the cluster across multiple availability zones."),
    field!(cluster.destroy_after_test: Boolean, "cluster.destroyAfterTest",
        env "DESTROY_CLUSTER", default = "false"
        => "Delete the cluster once the tests finish."),
    field!(cluster.expiry: Duration(Minutes), "cluster.expiryInMinutes",
        env "CLUSTER_EXPIRY_IN_MINUTES", default = "210"
        => "How long before the cluster expires and is deleted."),
    field!(cluster.after_test_wait: Duration(Minutes), "cluster.afterTestWait",
        env "AFTER_TEST_CLUSTER_WAIT", default = "60"
        => "How long to keep the cluster around after tests have run."),
    field!(cluster.install_timeout: Duration(Minutes), "cluster.installTimeout",
        env "CLUSTER_UP_TIMEOUT", default = "135"
        => "How long to wait before failing a cluster launch."),
    field!(cluster.use_latest_version_for_install: Boolean, "cluster.useLatestVersionForInstall",
        env "USE_LATEST_VERSION_FOR_INSTALL", default = "false"
        => "Install the latest available cluster image set."),
    field!(cluster.use_middle_version_for_install: Boolean,
        "cluster.useMiddleClusterVersionForInstall",
        env "USE_MIDDLE_CLUSTER_IMAGE_SET_FOR_INSTALL", default = "false"
        => "Install the image set in the middle of the known versions."),
    field!(cluster.use_oldest_version_for_install: Boolean,
        "cluster.useOldestClusterVersionForInstall",
        env "USE_OLDEST_CLUSTER_IMAGE_SET_FOR_INSTALL", default = "false"
        => "Install the oldest known image set."),
    field!(cluster.next_release_after_prod_default: Integer, "cluster.nextReleaseAfterProdDefault",
        env "NEXT_RELEASE_AFTER_PROD_DEFAULT", default = "-1"
        => "Install the image set this many releases after the production default."),
    field!(cluster.major_target: Integer, "cluster.majorTarget", env "MAJOR_TARGET"
        => "Major version to target during version selection."),
    field!(cluster.minor_target: Integer, "cluster.minorTarget", env "MINOR_TARGET"
        => "Minor version to target during version selection."),
    field!(cluster.clean_check_runs: Integer, "cluster.cleanCheckRuns",
        env "CLEAN_CHECK_RUNS", default = "20"
        => "Consecutive clean health checks required before the cluster counts as healthy."),
    // Addons
    field!(addons.ids: StringList, "addons.ids", env "ADDON_IDS"
        => "Addon IDs to install."),
    field!(addons.test_harnesses: StringList, "addons.testHarnesses", env "ADDON_TEST_HARNESSES"
        => "Container images that test the installed addons."),
    // Scale
    field!(scale.workloads_repository: String, "scale.workloadsRepository", env "WORKLOADS_REPO",
        default = "https://github.com/openshift-scale/workloads"
        => "Git repository holding scale workloads."),
    field!(scale.workloads_repository_branch: String, "scale.workloadsRepositoryBranch",
        env "WORKLOADS_REPO_BRANCH", default = "master"
        => "Branch of the workloads repository."),
    field!(scale.pbench_server: String, "scale.pbenchServer", env "PBENCH_SERVER",
        default = "pbench.dev.openshift.com"
        => "Pbench server that receives results."),
    field!(scale.pbench_ssh_private_key: String, "scale.pbenchSSHPrivateKey",
        env "PBENCH_SSH_PRIVATE_KEY", secret = true
        => "SSH private key for the pbench server."),
    field!(scale.pbench_ssh_public_key: String, "scale.pbenchSSHPublicKey",
        env "PBENCH_SSH_PUBLIC_KEY"
        => "SSH public key for the pbench server."),
    // Tests
    field!(tests.polling_timeout: Duration(Minutes), "tests.pollingTimeout",
        env "POLLING_TIMEOUT", default = "30"
        => "How long a check waits for an object before failing."),
    field!(tests.ginkgo_skip: String, "tests.ginkgoSkip", env "GINKGO_SKIP"
        => "Regex of test suites to skip."),
    field!(tests.ginkgo_focus: String, "tests.focus", env "GINKGO_FOCUS"
        => "Regex of test suites to focus on."),
    field!(tests.tests_to_run: StringList, "tests.testsToRun", env "TESTS_TO_RUN"
        => "Test files to execute as part of the suite."),
    field!(tests.suppress_skip_notifications: Boolean, "tests.suppressSkipNotifications",
        env "SUPPRESS_SKIP_NOTIFICATIONS", default = "true"
        => "Suppress notifications for skipped tests."),
    field!(tests.clean_runs: Integer, "tests.cleanRuns", env "CLEAN_RUNS"
        => "Number of times a test version runs before it is skipped."),
    field!(tests.operator_skip: String, "tests.operatorSkip", env "OPERATOR_SKIP",
        default = "insights"
        => "Comma-delimited operator names whose health checks are ignored."),
    field!(tests.skip_cluster_health_checks: Boolean, "tests.skipClusterHealthChecks",
        env "SKIP_CLUSTER_HEALTH_CHECKS", default = "false"
        => "Skip cluster health checks, e.g. against an already running cluster."),
    field!(tests.upload_metrics: Boolean, "tests.uploadMetrics", env "UPLOAD_METRICS",
        default = "false"
        => "Upload run metrics to the metrics bucket."),
    field!(tests.metrics_bucket: String, "tests.metricsBucket", env "METRICS_BUCKET",
        default = "osde2e-metrics"
        => "Bucket that metrics are uploaded to."),
    field!(tests.service_account: String, "tests.serviceAccount", env "SERVICE_ACCOUNT"
        => "User the tests run as; empty means the cluster admin."),
    // Weather
    field!(weather.prometheus_address: String, "weather.address", env "PROMETHEUS_ADDRESS"
        => "Address of the Prometheus instance to query."),
    field!(weather.prometheus_bearer_token: String, "weather.bearerToken",
        env "PROMETHEUS_BEARER_TOKEN", secret = true
        => "Bearer token for Prometheus."),
    field!(weather.start_of_time_window: Duration(Hours), "weather.startOfTimeWindowInHours",
        env "START_OF_TIME_WINDOW_IN_HOURS", default = "24"
        => "How far back the weather report looks."),
    field!(weather.number_of_samples_necessary: Integer, "weather.numberOfSamplesNecessary",
        env "NUMBER_OF_SAMPLES_NECESSARY", default = "3"
        => "Samples needed before a job is included in the report."),
    field!(weather.slack_webhook: String, "weather.slackWebhook", env "SLACK_WEBHOOK",
        secret = true
        => "Webhook the weather report is posted to."),
    field!(weather.job_whitelist: StringList, "weather.jobWhitelist", env "JOB_WHITELIST",
        default = "osde2e-.*-aws-e2e-.*"
        => "Job name regexes considered by the weather report."),
];

/// Look up a field by YAML path.
pub fn field(yaml_path: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.yaml_path == yaml_path)
}

/// YAML path of the log metrics list; it has no environment variable.
pub const LOG_METRICS_PATH: &str = "logMetrics";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Config, FieldValue};
    use std::collections::HashSet;

    #[test]
    fn test_yaml_paths_and_env_names_are_unique() {
        let mut paths = HashSet::new();
        let mut envs = HashSet::new();
        for spec in FIELDS {
            assert!(paths.insert(spec.yaml_path), "duplicate path {}", spec.yaml_path);
            assert!(envs.insert(spec.env), "duplicate env {}", spec.env);
        }
    }

    #[test]
    fn test_every_field_accepts_its_own_kind() {
        let mut config = Config::default();
        for spec in FIELDS {
            let zero = spec.kind.zero();
            assert!(
                (spec.apply)(&mut config, zero.clone()),
                "{} rejected a {} value",
                spec.yaml_path,
                spec.kind
            );
            assert_eq!((spec.read)(&config), zero, "{}", spec.yaml_path);
        }
    }

    #[test]
    fn test_apply_writes_the_named_field() {
        let mut config = Config::default();
        let spec = field("tests.operatorSkip").expect("field exists");
        assert!((spec.apply)(&mut config, FieldValue::String("telemetry".to_string())));
        assert_eq!(config.tests.operator_skip, "telemetry");
    }

    #[test]
    fn test_only_token_is_required() {
        let required: Vec<_> = FIELDS.iter().filter(|s| s.required).map(|s| s.yaml_path).collect();
        assert_eq!(required, vec!["ocm.token"]);
    }

    #[test]
    fn test_sections() {
        assert_eq!(field("provider").map(FieldSpec::section), Some("general"));
        assert_eq!(field("weather.address").map(FieldSpec::section), Some("weather"));
    }
}
