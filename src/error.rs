//! Error types for stimsync

use thiserror::Error;

/// Errors that can occur during session analysis
///
/// Everything here is fatal for the current run. Conditions the pipeline
/// recovers from (too few units for a profile, stimulus entries without
/// timestamps) are reported through logging or defined degenerate values
/// instead of an error.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to read recording file: {0}")]
    ReadError(String),

    #[error("Invalid recording JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid recording data: {0}")]
    ShapeError(String),

    #[error("Cannot parse session date from filename: {0}")]
    DateParseError(String),

    #[error("Invalid window configuration: {0}")]
    ConfigError(String),

    #[error("Figure output error: {0}")]
    ChartError(String),
}
