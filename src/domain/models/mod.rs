pub mod config;
pub mod field;
pub mod log_metric;

pub use config::{
    AddonConfig, ClusterConfig, Config, KubeConfig, OcmConfig, ScaleConfig, TestConfig,
    UpgradeConfig, WeatherConfig,
};
pub use field::{
    DefaultValue, DurationUnit, FieldKind, FieldSlot, FieldSpec, FieldValue, ResolveContext,
};
pub use log_metric::{LogMetric, LogMetrics, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD};
