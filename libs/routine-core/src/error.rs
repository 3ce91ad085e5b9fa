//! Error types for routine-core.

use thiserror::Error;

/// Errors raised while reading an `HH:MM` wall-clock value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("invalid time '{value}': expected HH:MM")]
    Format { value: String },

    #[error("hour out of range in '{value}'")]
    Hour { value: String },

    #[error("minute out of range in '{value}'")]
    Minute { value: String },
}

/// Errors raised while turning a model response into routine blocks.
///
/// All of these are recoverable: the generation layer answers every one of
/// them with the fallback routine.
#[derive(Debug, Error)]
pub enum ResponseError {
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is not a JSON array")]
    NotArray,

    #[error("response contains no blocks")]
    Empty,

    #[error("block {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("block {index} has invalid {field}: {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}
