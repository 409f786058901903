//! Error types for the sifter crate.
//!
//! The filtering pipeline itself never fails: unresolvable paths, type
//! mismatches and unparsable dates simply do not match. Errors only surface
//! from the explicit parsing entry points (config loading, date parsing).

use thiserror::Error;

/// Errors that can occur when loading configuration or parsing inputs.
#[derive(Debug, Error)]
pub enum SifterError {
    /// A date string could not be parsed into a timestamp.
    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    /// JSON configuration could not be deserialized.
    #[error("invalid JSON filter config: {0}")]
    Config(#[from] serde_json::Error),

    /// YAML configuration could not be deserialized.
    #[error("invalid YAML filter config: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),
}

/// Result type for sifter operations.
pub type Result<T> = std::result::Result<T, SifterError>;
