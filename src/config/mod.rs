//! Configuration management module

pub mod loader;
pub mod validation;

pub use loader::{CleanupPolicy, EnvValue, WorkflowConfig, normalize_env_value};
pub use validation::ConfigError;
