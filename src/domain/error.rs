// Chart error taxonomy
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures raised while loading, laying out or rendering a chart.
///
/// None of these terminate the process. They are logged where they are detected
/// and collected into the chart outcome so callers (and tests) can inspect them.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ChartError {
    #[error("missing required column '{column}' in {origin}")]
    MissingColumn { origin: String, column: String },

    #[error("malformed value '{value}' for column '{column}' on line {line}")]
    MalformedValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("unknown processor '{0}'")]
    UnknownProcessor(String),

    #[error("no data left to chart")]
    EmptyInput,

    #[error("failed to render {}: {reason}", .path.display())]
    RenderFailure { path: PathBuf, reason: String },
}

impl ChartError {
    /// Whether this diagnostic aborts the whole chart request.
    pub fn is_fatal_for_request(&self) -> bool {
        matches!(self, ChartError::EmptyInput)
    }
}
