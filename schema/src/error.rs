//! Error types for schema file operations.
//!
//! Covers reading and writing schema files, field-level shape problems, and
//! definition invariants reported by the core builder.

use argbind_core::DefinitionError;
use thiserror::Error;

/// Errors that can occur while loading or compiling a schema file.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// File extension is not one of `.json`, `.yml`, `.yaml`.
    #[error("unsupported schema format: {0}")]
    UnsupportedFormat(String),

    /// A field whose declaration is inconsistent on its own.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The compiled slots violate a definition invariant.
    #[error("invalid argument definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
