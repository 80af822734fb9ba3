use std::path::PathBuf;
use thiserror::Error;

/// Batch-level errors that abort a merge run.
///
/// Problems with a single record never surface here; those become
/// [`crate::validation::RejectReason`] values on a rejection instead.
#[derive(Error, Debug)]
pub enum MergeError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The top level of an input document is not a JSON object.
    #[error("Invalid document: expected a JSON object at the top level, got {0}")]
    InvalidDocument(String),

    /// A required top-level key is absent from an input document.
    #[error("Missing required top-level key '{key}'")]
    MissingKey { key: String },

    /// A top-level key is present but does not hold an array of records.
    #[error("Top-level key '{key}' must be a list, got {found}")]
    InvalidRecordList { key: String, found: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias used throughout the merge crates.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Human-readable name of a JSON value's type, used in error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "list",
        serde_json::Value::Object(_) => "object",
    }
}
