//! Field descriptors for the declarative configuration table.
//!
//! Each configuration leaf is described by a [`FieldSpec`]: where its value
//! may come from (YAML path, environment variable, built-in default), how the
//! raw text is parsed ([`FieldKind`]), and two plain functions that write the
//! parsed [`FieldValue`] into a [`Config`] and read it back out.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use super::config::Config;

/// Unit applied to a bare integer given for a duration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationUnit {
    Seconds,
    Minutes,
    Hours,
}

impl DurationUnit {
    /// Duration of `amount` units, or `None` if the seconds overflow.
    pub const fn of(self, amount: u64) -> Option<Duration> {
        let factor = match self {
            Self::Seconds => 1,
            Self::Minutes => 60,
            Self::Hours => 3600,
        };
        match amount.checked_mul(factor) {
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        }
    }

    /// Lowercase plural name, used in docs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
        }
    }
}

/// Declared type of a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    StringList,
    Duration(DurationUnit),
}

impl FieldKind {
    /// Value used when a non-required field has no source at all.
    pub const fn zero(self) -> FieldValue {
        match self {
            Self::String => FieldValue::String(String::new()),
            Self::Integer => FieldValue::Integer(0),
            Self::Boolean => FieldValue::Boolean(false),
            Self::StringList => FieldValue::StringList(Vec::new()),
            Self::Duration(_) => FieldValue::Duration(Duration::ZERO),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::StringList => write!(f, "list of strings"),
            Self::Duration(unit) => write!(f, "duration ({})", unit.as_str()),
        }
    }
}

/// A parsed configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    StringList(Vec<String>),
    Duration(Duration),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::StringList(items) => write!(f, "{}", items.join(",")),
            Self::Duration(d) => write!(f, "{}", humantime::format_duration(*d)),
        }
    }
}

impl FieldValue {
    /// JSON rendering used by `config show --json`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::from(s.as_str()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Boolean(b) => serde_json::Value::from(*b),
            Self::StringList(items) => serde_json::Value::from(items.clone()),
            Self::Duration(d) => {
                serde_json::Value::from(humantime::format_duration(*d).to_string())
            }
        }
    }
}

/// Conversion between a typed config slot and a [`FieldValue`].
pub trait FieldSlot: Sized {
    /// Extract the slot type, or `None` if the variant does not match.
    fn from_field_value(value: FieldValue) -> Option<Self>;

    /// Wrap the slot value.
    fn to_field_value(&self) -> FieldValue;
}

impl FieldSlot for String {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl FieldSlot for i64 {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Integer(i) => Some(i),
            _ => None,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }
}

impl FieldSlot for bool {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl FieldSlot for Vec<String> {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::StringList(items) => Some(items),
            _ => None,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::StringList(self.clone())
    }
}

impl FieldSlot for Duration {
    fn from_field_value(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Duration(d) => Some(d),
            _ => None,
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Duration(*self)
    }
}

/// Store `value` into `slot` when the variant matches the slot type.
///
/// Returns `false` on a mismatch, which only happens if a table entry
/// declares a kind that disagrees with its struct field.
pub fn assign<T: FieldSlot>(slot: &mut T, value: FieldValue) -> bool {
    match T::from_field_value(value) {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

/// Inputs for placeholder defaults that depend on the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveContext {
    /// Base directory for the default report directory
    pub temp_dir: std::path::PathBuf,
    /// Short token identifying this run
    pub run_suffix: String,
}

impl ResolveContext {
    /// Context for a fresh run: system temp dir plus a random 3-char suffix.
    pub fn generate() -> Self {
        let token = uuid::Uuid::new_v4().simple().to_string();
        Self {
            temp_dir: std::env::temp_dir(),
            run_suffix: token[..3].to_string(),
        }
    }

    /// Context with fixed values, for reproducible resolution.
    pub fn fixed(temp_dir: impl AsRef<Path>, run_suffix: impl Into<String>) -> Self {
        Self {
            temp_dir: temp_dir.as_ref().to_path_buf(),
            run_suffix: run_suffix.into(),
        }
    }
}

/// Built-in default for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Raw text parsed like an environment variable
    Literal(&'static str),
    /// `<temp dir>/e2e-<run suffix>`
    ReportDir,
    /// The run suffix itself
    RunSuffix,
}

impl DefaultValue {
    /// Raw default text for this run.
    pub fn render(self, context: &ResolveContext) -> String {
        match self {
            Self::Literal(raw) => raw.to_string(),
            Self::ReportDir => context
                .temp_dir
                .join(format!("e2e-{}", context.run_suffix))
                .display()
                .to_string(),
            Self::RunSuffix => context.run_suffix.clone(),
        }
    }

    /// Human description used in docs.
    pub fn describe(self) -> String {
        match self {
            Self::Literal(raw) => raw.to_string(),
            Self::ReportDir => "<temp dir>/e2e-<suffix>".to_string(),
            Self::RunSuffix => "<random 3 chars>".to_string(),
        }
    }
}

impl From<&'static str> for DefaultValue {
    fn from(raw: &'static str) -> Self {
        Self::Literal(raw)
    }
}

/// One row of the configuration table.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    /// Dotted YAML path; also the field's identifier
    pub yaml_path: &'static str,
    /// Environment variable name
    pub env: &'static str,
    pub kind: FieldKind,
    pub default: Option<DefaultValue>,
    pub required: bool,
    /// Value is redacted when printed
    pub secret: bool,
    pub description: &'static str,
    /// Write a parsed value into the config
    pub apply: fn(&mut Config, FieldValue) -> bool,
    /// Read the current value back out
    pub read: fn(&Config) -> FieldValue,
}

impl FieldSpec {
    /// Docs section: the first YAML path segment, or `general` for top-level fields.
    pub fn section(&self) -> &'static str {
        match self.yaml_path.split_once('.') {
            Some((section, _)) => section,
            None => "general",
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("yaml_path", &self.yaml_path)
            .field("env", &self.env)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("required", &self.required)
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}
