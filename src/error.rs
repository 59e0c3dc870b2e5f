//! Error types for the Graph Data Science client

use thiserror::Error;

/// Errors that can occur when calling server procedures
#[derive(Error, Debug)]
pub enum GdsError {
    /// The server rejected or failed to execute the query
    #[error("Query error: {0}")]
    QueryError(String),

    /// Transport-level failure (unexpected HTTP status, unreachable server)
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed YAML configuration file
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A field was expected in the result but no rows came back
    #[error("Expected field '{field}' but the query returned no rows")]
    EmptyResult { field: String },

    /// The first result row lacks the expected field
    #[error("Result row has no field '{field}'")]
    MissingField { field: String },

    /// The field exists but holds a different JSON type
    #[error("Field '{field}' is not {expected}")]
    UnexpectedType { field: String, expected: &'static str },

    /// A configuration key the target operation does not accept
    #[error("Illegal configuration key '{key}' for {procedure} (allowed: {allowed})")]
    IllegalConfigKey {
        procedure: String,
        key: String,
        allowed: String,
    },

    /// Procedure namespace or suffix that is not a dotted identifier
    #[error("Invalid procedure name: {0}")]
    InvalidProcedureName(String),
}

pub type GdsResult<T> = Result<T, GdsError>;
