//! Error types for schema loading.

use thiserror::Error;

/// Errors that can occur while reading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The input is not YAML at all.
    #[error("invalid schema YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Valid YAML that does not describe a schema.
    #[error("invalid schema at {path}: {message}")]
    Shape { path: String, message: String },

    /// Error reading a schema file.
    #[error("failed to load schema: {path}: {message}")]
    Load { path: String, message: String },
}

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;
