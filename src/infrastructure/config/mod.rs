//! Configuration resolution infrastructure
//!
//! Builds the read-only [`Config`](crate::domain::models::Config) snapshot:
//! - Declarative field table (YAML path, env var, default, type)
//! - YAML file layering with figment
//! - Environment variable sources
//! - Precedence: YAML > environment > default > zero value

pub mod env;
pub mod loader;
pub mod schema;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use loader::{ConfigLoader, ValueSource};
pub use schema::FIELDS;
