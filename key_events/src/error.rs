//! Error types for the key_events crate

use thiserror::Error;

/// Custom error types for the key_events crate
#[derive(Debug, Error)]
pub enum ImpactError {
    /// Required columns absent from the uploaded table
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Not enough observations to estimate every parameter
    #[error(
        "Ill-conditioned fit: {observations} observations for {parameters} parameters"
    )]
    IllConditionedFit {
        observations: usize,
        parameters: usize,
    },

    /// Feature name that is not one of the known predictors
    #[error("Unknown feature: '{0}' (expected one of: Total users, New users, Sessions, Bounce rate)")]
    UnknownFeature(String),

    /// Mismatched lengths between related inputs
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Cell or date that could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Persisted model file that cannot be used
    #[error("Model format error: {0}")]
    ModelFormat(String),

    /// Configuration that cannot be loaded or is inconsistent
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the CSV reader or writer
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from JSON (de)serialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ImpactError>;
