use std::path::Path;

use figment::providers::{Format, Yaml};
use figment::Figment;
use serde_yaml::Value;

use super::env::{EnvSource, ProcessEnv};
use super::schema::{FIELDS, LOG_METRICS_PATH};
use crate::domain::errors::{ConfigError, MissingField};
use crate::domain::models::{
    Config, DurationUnit, FieldKind, FieldSpec, FieldValue, LogMetrics, ResolveContext,
};

/// Which source supplied a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Yaml,
    Env,
    Default,
    Zero,
}

/// Resolves the configuration snapshot from YAML, environment and defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a run
    ///
    /// YAML files are merged in order with figment (later files win, maps
    /// merge deeply), then every field is resolved against the process
    /// environment.
    pub fn load(
        paths: &[impl AsRef<Path>],
        context: &ResolveContext,
    ) -> Result<Config, ConfigError> {
        let yaml = Self::read_yaml(paths)?;
        Self::resolve(&ProcessEnv, yaml.as_ref(), context)
    }

    /// Merge YAML files into one document. `None` when no paths are given.
    pub fn read_yaml(paths: &[impl AsRef<Path>]) -> Result<Option<Value>, ConfigError> {
        if paths.is_empty() {
            return Ok(None);
        }

        let mut figment = Figment::new();
        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "merging configuration file");
            figment = figment.merge(Yaml::file(path));
        }

        let doc: Value = figment.extract()?;
        Ok(Some(doc))
    }

    /// Resolve the full field table.
    ///
    /// Per field: YAML value, else environment variable, else built-in
    /// default, else the zero value when the field is optional. Type errors
    /// fail immediately; unset required fields are collected and reported
    /// together.
    pub fn resolve(
        env: &dyn EnvSource,
        yaml: Option<&Value>,
        context: &ResolveContext,
    ) -> Result<Config, ConfigError> {
        Self::resolve_fields(FIELDS, env, yaml, context)
    }

    /// Resolve an explicit set of fields; fields not listed keep zero values.
    pub fn resolve_fields(
        fields: &[FieldSpec],
        env: &dyn EnvSource,
        yaml: Option<&Value>,
        context: &ResolveContext,
    ) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        let mut missing = Vec::new();

        for spec in fields {
            let (value, source) = match Self::resolve_field(spec, env, yaml, context)? {
                Some(found) => found,
                None if spec.required => {
                    missing.push(MissingField {
                        field: spec.yaml_path.to_string(),
                        env: spec.env.to_string(),
                    });
                    continue;
                }
                None => (spec.kind.zero(), ValueSource::Zero),
            };

            tracing::trace!(field = spec.yaml_path, source = ?source, "resolved field");

            if !(spec.apply)(&mut config, value) {
                return Err(ConfigError::Load(format!(
                    "field table declares {} as {} but the config slot disagrees",
                    spec.yaml_path, spec.kind
                )));
            }
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingRequiredField(missing));
        }

        config.log_metrics = Self::resolve_log_metrics(yaml)?;
        Ok(config)
    }

    /// Value and source for a single field, or `None` when nothing sets it.
    pub fn resolve_field(
        spec: &FieldSpec,
        env: &dyn EnvSource,
        yaml: Option<&Value>,
        context: &ResolveContext,
    ) -> Result<Option<(FieldValue, ValueSource)>, ConfigError> {
        // An empty string does not satisfy a required field.
        let node = yaml
            .and_then(|doc| lookup(doc, spec.yaml_path))
            .filter(|node| !(spec.required && node.as_str() == Some("")));

        if let Some(node) = node {
            return parse_yaml(spec, node).map(|v| Some((v, ValueSource::Yaml)));
        }

        if let Some(raw) = env.get(spec.env).filter(|raw| !raw.is_empty()) {
            return parse_raw(spec, &raw).map(|v| Some((v, ValueSource::Env)));
        }

        if let Some(default) = spec.default {
            let raw = default.render(context);
            return parse_raw(spec, &raw).map(|v| Some((v, ValueSource::Default)));
        }

        Ok(None)
    }

    fn resolve_log_metrics(yaml: Option<&Value>) -> Result<LogMetrics, ConfigError> {
        let Some(node) = yaml.and_then(|doc| lookup(doc, LOG_METRICS_PATH)) else {
            return Ok(LogMetrics::default());
        };

        let metrics: LogMetrics = serde_yaml::from_value(node.clone())
            .map_err(|err| ConfigError::InvalidLogMetrics(err.to_string()))?;

        for metric in &metrics {
            metric.compile()?;
            if metric.low_threshold >= metric.high_threshold {
                tracing::warn!(
                    metric = %metric.name,
                    low = metric.low_threshold,
                    high = metric.high_threshold,
                    "log metric thresholds leave no passing count"
                );
            }
        }

        Ok(metrics)
    }
}

/// Walk a dotted path through nested mappings. Explicit nulls count as absent.
fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(doc, |node, segment| node.get(segment))
        .filter(|node| !node.is_null())
}

fn invalid(spec: &FieldSpec, value: impl Into<String>) -> ConfigError {
    ConfigError::InvalidFieldType {
        field: spec.yaml_path.to_string(),
        value: value.into(),
        expected: spec.kind.to_string(),
    }
}

/// Parse raw text (environment variable or default) per the field's kind.
fn parse_raw(spec: &FieldSpec, raw: &str) -> Result<FieldValue, ConfigError> {
    let parsed = match spec.kind {
        FieldKind::String => Some(FieldValue::String(raw.to_string())),
        FieldKind::Integer => raw.trim().parse::<i64>().ok().map(FieldValue::Integer),
        FieldKind::Boolean => parse_bool(raw).map(FieldValue::Boolean),
        FieldKind::StringList => Some(FieldValue::StringList(split_list(raw))),
        FieldKind::Duration(unit) => parse_duration(raw, unit).map(FieldValue::Duration),
    };
    parsed.ok_or_else(|| invalid(spec, raw))
}

/// Convert a YAML node per the field's kind. Scalars given as strings are
/// parsed the same way as environment variables.
fn parse_yaml(spec: &FieldSpec, node: &Value) -> Result<FieldValue, ConfigError> {
    if let Value::String(raw) = node {
        return parse_raw(spec, raw);
    }

    let parsed = match (spec.kind, node) {
        (FieldKind::String, Value::Number(n)) => Some(FieldValue::String(n.to_string())),
        (FieldKind::String, Value::Bool(b)) => Some(FieldValue::String(b.to_string())),
        (FieldKind::Integer, Value::Number(n)) => n.as_i64().map(FieldValue::Integer),
        (FieldKind::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
        (FieldKind::StringList, Value::Sequence(items)) => items
            .iter()
            .map(scalar_to_string)
            .collect::<Option<Vec<_>>>()
            .map(FieldValue::StringList),
        (FieldKind::Duration(unit), Value::Number(n)) => {
            n.as_u64().and_then(|amount| unit.of(amount)).map(FieldValue::Duration)
        }
        _ => None,
    };

    parsed.ok_or_else(|| invalid(spec, render_yaml(node)))
}

fn scalar_to_string(node: &Value) -> Option<String> {
    match node {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn render_yaml(node: &Value) -> String {
    serde_yaml::to_string(node)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{node:?}"))
}

/// Booleans as accepted by the CI environment: `1 t T TRUE true True` and
/// their false counterparts.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Comma-separated list; items are trimmed and empty items dropped.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A bare integer is an amount of `unit`; anything else goes to humantime.
fn parse_duration(raw: &str, unit: DurationUnit) -> Option<std::time::Duration> {
    let raw = raw.trim();
    if let Ok(amount) = raw.parse::<u64>() {
        return unit.of(amount);
    }
    humantime::parse_duration(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::env::MapEnv;
    use crate::infrastructure::config::schema::field;
    use std::time::Duration;

    fn context() -> ResolveContext {
        ResolveContext::fixed("/tmp", "xyz")
    }

    fn token_env() -> MapEnv {
        MapEnv::new().with("OCM_TOKEN", "secret-token")
    }

    #[test]
    fn test_defaults_apply() {
        let config = ConfigLoader::resolve(&token_env(), None, &context()).expect("resolves");

        assert_eq!(config.provider, "ocm");
        assert_eq!(config.ocm.env, "prod");
        assert_eq!(config.ocm.num_retries, 3);
        assert_eq!(config.tests.polling_timeout, Duration::from_secs(30 * 60));
        assert!(config.tests.suppress_skip_notifications);
        assert_eq!(config.tests.operator_skip, "insights");
        assert_eq!(config.cluster.next_release_after_prod_default, -1);
        assert_eq!(config.weather.start_of_time_window, Duration::from_secs(24 * 3600));
        assert_eq!(config.weather.job_whitelist, vec!["osde2e-.*-aws-e2e-.*"]);
        assert_eq!(config.suffix, "xyz");
        assert_eq!(config.report_dir, "/tmp/e2e-xyz");
        assert_eq!(config.job_id, 0);
        assert!(config.addons.ids.is_empty());
    }

    #[test]
    fn test_yaml_beats_env_beats_default() {
        let env = token_env().with("OSD_ENV", "stage").with("NUM_RETRIES", "7");
        let yaml: Value = serde_yaml::from_str("ocm:\n  env: int\n").expect("YAML should parse");

        let config = ConfigLoader::resolve(&env, Some(&yaml), &context()).expect("resolves");

        assert_eq!(config.ocm.env, "int", "YAML should win over env");
        assert_eq!(config.ocm.num_retries, 7, "env should win over default");
        assert_eq!(config.ocm.token, "secret-token");
    }

    #[test]
    fn test_missing_required_field() {
        let err = ConfigLoader::resolve(&MapEnv::new(), None, &context())
            .expect_err("token is required");
        assert_eq!(err.missing_fields(), vec!["ocm.token"]);
    }

    #[test]
    fn test_missing_fields_are_all_reported() {
        let mut first = *field("ocm.token").expect("field exists");
        let mut second = *field("weather.address").expect("field exists");
        first.required = true;
        second.required = true;

        let err = ConfigLoader::resolve_fields(&[first, second], &MapEnv::new(), None, &context())
            .expect_err("both fields are required");
        assert_eq!(err.missing_fields(), vec!["ocm.token", "weather.address"]);
    }

    #[test]
    fn test_invalid_env_value_names_field_and_value() {
        let env = token_env().with("NUM_RETRIES", "three");
        let err = ConfigLoader::resolve(&env, None, &context()).expect_err("not an integer");
        match err {
            ConfigError::InvalidFieldType { field, value, .. } => {
                assert_eq!(field, "ocm.numRetries");
                assert_eq!(value, "three");
            }
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_yaml_value() {
        let yaml: Value = serde_yaml::from_str("cluster:\n  multiAZ: [1, 2]\n").expect("parses");
        let err = ConfigLoader::resolve(&token_env(), Some(&yaml), &context())
            .expect_err("a list is not a boolean");
        assert!(matches!(err, ConfigError::InvalidFieldType { ref field, .. } if field == "cluster.multiAZ"));
    }

    #[test]
    fn test_overflowing_duration_env_is_invalid() {
        let env = token_env().with("POLLING_TIMEOUT", "307445734561825861");
        let err = ConfigLoader::resolve(&env, None, &context()).expect_err("minutes overflow");
        match err {
            ConfigError::InvalidFieldType { field, value, .. } => {
                assert_eq!(field, "tests.pollingTimeout");
                assert_eq!(value, "307445734561825861");
            }
            other => panic!("Expected InvalidFieldType, got {other:?}"),
        }
    }

    #[test]
    fn test_overflowing_duration_yaml_is_invalid() {
        let yaml: Value = serde_yaml::from_str(
            "weather:\n  startOfTimeWindowInHours: 18446744073709551615\n",
        )
        .expect("parses");
        let err = ConfigLoader::resolve(&token_env(), Some(&yaml), &context())
            .expect_err("hours overflow");
        assert!(matches!(
            err,
            ConfigError::InvalidFieldType { ref field, .. } if field == "weather.startOfTimeWindowInHours"
        ));
    }

    #[test]
    fn test_empty_yaml_string_does_not_satisfy_required_field() {
        let yaml: Value = serde_yaml::from_str("ocm:\n  token: \"\"\n").expect("parses");
        let err = ConfigLoader::resolve(&MapEnv::new(), Some(&yaml), &context())
            .expect_err("empty token is unset");
        assert_eq!(err.missing_fields(), vec!["ocm.token"]);

        let config = ConfigLoader::resolve(&token_env(), Some(&yaml), &context())
            .expect("env fills the empty token");
        assert_eq!(config.ocm.token, "secret-token");
    }

    #[test]
    fn test_empty_yaml_string_sets_optional_field() {
        let yaml: Value = serde_yaml::from_str("tests:\n  operatorSkip: \"\"\n").expect("parses");
        let config = ConfigLoader::resolve(&token_env(), Some(&yaml), &context()).expect("resolves");
        assert_eq!(config.tests.operator_skip, "");
    }

    #[test]
    fn test_empty_env_counts_as_unset() {
        let env = token_env().with("OSD_ENV", "");
        let config = ConfigLoader::resolve(&env, None, &context()).expect("resolves");
        assert_eq!(config.ocm.env, "prod");
    }

    #[test]
    fn test_yaml_null_counts_as_absent() {
        let env = token_env().with("OSD_ENV", "stage");
        let yaml: Value = serde_yaml::from_str("ocm:\n  env: ~\n").expect("parses");
        let config = ConfigLoader::resolve(&env, Some(&yaml), &context()).expect("resolves");
        assert_eq!(config.ocm.env, "stage");
    }

    #[test]
    fn test_env_parsing_rules() {
        let env = token_env()
            .with("MULTI_AZ", "T")
            .with("ADDON_IDS", " a, b ,,c ")
            .with("POLLING_TIMEOUT", "90s")
            .with("CLUSTER_UP_TIMEOUT", "2h 15m");

        let config = ConfigLoader::resolve(&env, None, &context()).expect("resolves");

        assert!(config.cluster.multi_az);
        assert_eq!(config.addons.ids, vec!["a", "b", "c"]);
        assert_eq!(config.tests.polling_timeout, Duration::from_secs(90));
        assert_eq!(config.cluster.install_timeout, Duration::from_secs(2 * 3600 + 15 * 60));
    }

    #[test]
    fn test_yaml_list_forms() {
        let yaml: Value = serde_yaml::from_str(
            "addons:\n  ids: [x, y]\n  testHarnesses: 'quay.io/a, quay.io/b'\n",
        )
        .expect("parses");
        let config = ConfigLoader::resolve(&token_env(), Some(&yaml), &context()).expect("resolves");
        assert_eq!(config.addons.ids, vec!["x", "y"]);
        assert_eq!(config.addons.test_harnesses, vec!["quay.io/a", "quay.io/b"]);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let env = token_env().with("JOB_NAME", "nightly");
        let first = ConfigLoader::resolve(&env, None, &context()).expect("resolves");
        let second = ConfigLoader::resolve(&env, None, &context()).expect("resolves");
        assert_eq!(first, second);
    }

    #[test]
    fn test_log_metrics_from_yaml() {
        let yaml: Value = serde_yaml::from_str(
            "logMetrics:\n  - name: panics\n    regex: 'panic:'\n    highThreshold: 1\n",
        )
        .expect("parses");
        let config = ConfigLoader::resolve(&token_env(), Some(&yaml), &context()).expect("resolves");
        let metric = config.log_metrics.get_metric_by_name("panics");
        assert_eq!(metric.high_threshold, 1);
        assert_eq!(metric.low_threshold, -1);
    }

    #[test]
    fn test_invalid_log_metric_pattern() {
        let yaml: Value =
            serde_yaml::from_str("logMetrics:\n  - name: bad\n    regex: '(['\n").expect("parses");
        let err = ConfigLoader::resolve(&token_env(), Some(&yaml), &context())
            .expect_err("regex does not compile");
        assert!(matches!(err, ConfigError::InvalidMetricPattern { ref metric, .. } if metric == "bad"));
    }

    #[test]
    fn test_parse_bool() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_read_yaml_missing_file() {
        let err = ConfigLoader::read_yaml(&["/definitely/not/here.yaml"])
            .expect_err("file does not exist");
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_read_yaml_merges_in_order() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base = NamedTempFile::new().unwrap();
        writeln!(base, "ocm:\n  env: stage\n  numRetries: 5\nprovider: mock").unwrap();
        base.flush().unwrap();

        let mut overlay = NamedTempFile::new().unwrap();
        writeln!(overlay, "ocm:\n  env: int").unwrap();
        overlay.flush().unwrap();

        let doc = ConfigLoader::read_yaml(&[base.path(), overlay.path()])
            .unwrap()
            .expect("document present");
        let config = ConfigLoader::resolve(&token_env(), Some(&doc), &context()).unwrap();

        assert_eq!(config.ocm.env, "int", "Later file should win");
        assert_eq!(config.ocm.num_retries, 5, "Earlier value should persist when not overridden");
        assert_eq!(config.provider, "mock");
    }

    #[test]
    fn test_read_yaml_without_paths() {
        let paths: [&str; 0] = [];
        assert!(ConfigLoader::read_yaml(&paths).unwrap().is_none());
    }
}
